//! Error types for the Hardware Classification Operator
//!
//! Classification itself never fails: every run ends in a typed
//! [`MatchOutcome`](crate::classification::MatchOutcome). These errors cover the
//! I/O boundary around it (inventory fetches, label writes, manifest loading).

use crate::classification::ValidationError;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for the operator
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Profile Errors
    // =========================================================================
    #[error("Profile validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Profile not found: {namespace}/{name}")]
    ProfileNotFound { namespace: String, name: String },

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error("Failed to fetch inventory for namespace {namespace}: {reason}")]
    InventoryFetch { namespace: String, reason: String },

    #[error("Host not found: {namespace}/{host}")]
    HostNotFound { namespace: String, host: String },

    #[error("Failed to update label {key} on host {host}: {reason}")]
    LabelUpdate {
        host: String,
        key: String,
        reason: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Manifest parse error in {path}: {reason}")]
    ManifestParse { path: String, reason: String },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Action to take on error during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Requeue with exponential backoff
    RequeueWithBackoff,
    /// Requeue after specific duration
    RequeueAfter(Duration),
    /// Don't requeue, wait for changes
    NoRequeue,
}

impl Error {
    /// Determine what action to take for this error
    pub fn action(&self) -> ErrorAction {
        match self {
            // Transient collaborator errors - retry with backoff
            Error::InventoryFetch { .. } | Error::LabelUpdate { .. } => {
                ErrorAction::RequeueWithBackoff
            }

            // Host may not have been registered yet
            Error::HostNotFound { .. } => ErrorAction::RequeueAfter(Duration::from_secs(60)),

            // Profile problems only change when the user edits the profile
            Error::Configuration(_)
            | Error::Validation(_)
            | Error::ProfileNotFound { .. }
            | Error::ManifestParse { .. }
            | Error::JsonParse(_)
            | Error::YamlParse(_) => ErrorAction::NoRequeue,

            _ => ErrorAction::RequeueWithBackoff,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        !matches!(self.action(), ErrorAction::NoRequeue)
    }

    /// Check if this error is transient
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::InventoryFetch { .. } | Error::LabelUpdate { .. }
        )
    }
}

/// Result type alias for the operator
pub type Result<T> = std::result::Result<T, Error>;
