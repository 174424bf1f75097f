//! Manifest Loading
//!
//! Reads HardwareClassification manifests and inventory snapshots from disk.
//! YAML and JSON are both accepted (JSON is valid YAML).

use crate::crd::HardwareClassification;
use crate::domain::InventoryHost;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Inventory file layout: either a bare list of hosts or `{hosts: [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InventoryFile {
    List(Vec<InventoryHost>),
    Wrapped { hosts: Vec<InventoryHost> },
}

/// Load a HardwareClassification manifest
pub fn load_profile(path: impl AsRef<Path>) -> Result<HardwareClassification> {
    let profile: HardwareClassification = load(path.as_ref())?;
    debug!(
        path = %path.as_ref().display(),
        characteristics = profile.profile().active_count(),
        "loaded hardware profile"
    );
    Ok(profile)
}

/// Load an inventory snapshot
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Vec<InventoryHost>> {
    let hosts = match load::<InventoryFile>(path.as_ref())? {
        InventoryFile::List(hosts) | InventoryFile::Wrapped { hosts } => hosts,
    };
    debug!(path = %path.as_ref().display(), hosts = hosts.len(), "loaded inventory");
    Ok(hosts)
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| Error::ManifestParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
