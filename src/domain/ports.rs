//! Domain Ports - Collaborator traits for the classification operator
//!
//! The classifier is pure. These traits define the boundary to the systems that
//! supply inventory and persist labels; adapters implement them.

use crate::domain::inventory::InventoryHost;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

// =============================================================================
// Inventory Provider Port
// =============================================================================

/// Port for reading the host inventory
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// List every host in a namespace, introspected or not.
    ///
    /// The returned list must be a consistent snapshot for one classification run.
    async fn list_hosts(&self, namespace: &str) -> Result<Vec<InventoryHost>>;
}

// =============================================================================
// Host Labeler Port
// =============================================================================

/// Port for writing classification labels onto hosts.
///
/// Both operations must be idempotent.
#[async_trait]
pub trait HostLabeler: Send + Sync {
    /// Set `key=value` on a host
    async fn set_label(&self, namespace: &str, host: &str, key: &str, value: &str) -> Result<()>;

    /// Remove `key` from a host; removing an absent label succeeds
    async fn remove_label(&self, namespace: &str, host: &str, key: &str) -> Result<()>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type InventoryProviderRef = Arc<dyn InventoryProvider>;
pub type HostLabelerRef = Arc<dyn HostLabeler>;
