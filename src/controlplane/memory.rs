//! In-Memory Inventory
//!
//! Holds hosts per namespace and implements both collaborator ports. Used by
//! the CLI and by tests.

use crate::domain::{HostLabeler, InventoryHost, InventoryProvider};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Host inventory keyed by namespace
#[derive(Debug, Default)]
pub struct MemoryInventory {
    namespaces: RwLock<BTreeMap<String, Vec<InventoryHost>>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inventory holding `hosts` in one namespace
    pub fn with_hosts(namespace: impl Into<String>, hosts: Vec<InventoryHost>) -> Self {
        let inventory = Self::new();
        inventory.namespaces.write().insert(namespace.into(), hosts);
        inventory
    }

    /// Add or replace a host
    pub fn upsert_host(&self, namespace: &str, host: InventoryHost) {
        let mut namespaces = self.namespaces.write();
        let hosts = namespaces.entry(namespace.to_string()).or_default();
        match hosts.iter_mut().find(|h| h.name == host.name) {
            Some(existing) => *existing = host,
            None => hosts.push(host),
        }
    }

    /// Snapshot of the hosts in a namespace
    pub fn hosts(&self, namespace: &str) -> Vec<InventoryHost> {
        self.namespaces
            .read()
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// Labels currently set on a host
    pub fn labels_of(&self, namespace: &str, host: &str) -> Option<BTreeMap<String, String>> {
        self.namespaces
            .read()
            .get(namespace)?
            .iter()
            .find(|h| h.name == host)
            .map(|h| h.labels.clone())
    }

    fn with_host_mut<F>(&self, namespace: &str, host: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut InventoryHost),
    {
        let mut namespaces = self.namespaces.write();
        let entry = namespaces
            .get_mut(namespace)
            .and_then(|hosts| hosts.iter_mut().find(|h| h.name == host))
            .ok_or_else(|| Error::HostNotFound {
                namespace: namespace.to_string(),
                host: host.to_string(),
            })?;
        f(entry);
        Ok(())
    }
}

#[async_trait]
impl InventoryProvider for MemoryInventory {
    async fn list_hosts(&self, namespace: &str) -> Result<Vec<InventoryHost>> {
        Ok(self.hosts(namespace))
    }
}

#[async_trait]
impl HostLabeler for MemoryInventory {
    async fn set_label(&self, namespace: &str, host: &str, key: &str, value: &str) -> Result<()> {
        self.with_host_mut(namespace, host, |h| {
            h.labels.insert(key.to_string(), value.to_string());
        })
    }

    async fn remove_label(&self, namespace: &str, host: &str, key: &str) -> Result<()> {
        self.with_host_mut(namespace, host, |h| {
            h.labels.remove(key);
        })
    }
}
