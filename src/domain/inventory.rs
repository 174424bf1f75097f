//! Hardware Inventory Types
//!
//! Introspected hardware facts for bare-metal hosts, as supplied by the
//! inventory provider. Every field defaults to its zero value so partial
//! introspection data still deserializes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Hardware Record
// =============================================================================

/// Introspected hardware of one machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineHardwareRecord {
    /// Join key for classification output
    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub cpu: CpuInfo,

    #[serde(default)]
    pub ram_mebibytes: i64,

    #[serde(default)]
    pub nics: Vec<NetworkInterface>,

    #[serde(default)]
    pub storage: Vec<StorageDevice>,

    #[serde(default)]
    pub firmware: FirmwareInfo,

    #[serde(default)]
    pub system_vendor: SystemVendorInfo,
}

impl MachineHardwareRecord {
    /// Number of network interfaces
    pub fn nic_count(&self) -> i32 {
        i32::try_from(self.nics.len()).unwrap_or(i32::MAX)
    }

    /// Total raw capacity of all storage devices
    pub fn total_storage_bytes(&self) -> u64 {
        self.storage.iter().map(|d| d.size_bytes).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    #[serde(default)]
    pub arch: String,

    #[serde(default)]
    pub count: i32,

    #[serde(default)]
    pub clock_megahertz: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub mac: String,

    #[serde(default)]
    pub speed_gbps: i32,
}

/// A block device attached to the machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDevice {
    /// Kernel device name (e.g., /dev/sda)
    #[serde(default)]
    pub name: String,

    /// SCSI host:channel:target:lun address (e.g., 0:0:0:0)
    #[serde(default, rename = "hctl")]
    pub location_code: String,

    #[serde(default)]
    pub rotational: bool,

    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareInfo {
    #[serde(default)]
    pub bios: BiosInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiosInfo {
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub vendor: String,

    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemVendorInfo {
    #[serde(default)]
    pub manufacturer: String,

    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub serial_number: String,
}

// =============================================================================
// Inventory Host
// =============================================================================

/// A host known to the inventory, with or without introspection data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryHost {
    /// Object name of the host
    pub name: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Absent until the host has been introspected
    #[serde(default, rename = "hardwareDetails", skip_serializing_if = "Option::is_none")]
    pub hardware: Option<MachineHardwareRecord>,
}

impl InventoryHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_hardware(mut self, hardware: MachineHardwareRecord) -> Self {
        self.hardware = Some(hardware);
        self
    }

    /// The hardware record keyed by the host's object name, if introspected
    pub fn hardware_record(&self) -> Option<MachineHardwareRecord> {
        self.hardware.as_ref().map(|hw| MachineHardwareRecord {
            hostname: self.name.clone(),
            ..hw.clone()
        })
    }

    /// Check if the host carries `key=value`
    pub fn has_label(&self, key: &str, value: &str) -> bool {
        self.labels.get(key).map(|v| v == value).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_record_deserializes() {
        let json = r#"{"cpu": {"count": 4}, "storage": [{"name": "/dev/sda", "sizeBytes": 1000}]}"#;
        let record: MachineHardwareRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.cpu.count, 4);
        assert_eq!(record.cpu.clock_megahertz, 0);
        assert_eq!(record.ram_mebibytes, 0);
        assert_eq!(record.nic_count(), 0);
        assert_eq!(record.storage[0].location_code, "");
        assert!(!record.storage[0].rotational);
        assert_eq!(record.total_storage_bytes(), 1000);
    }

    #[test]
    fn test_hardware_record_uses_host_name() {
        let host = InventoryHost::new("worker-0").with_hardware(MachineHardwareRecord {
            hostname: "localhost.localdomain".into(),
            ram_mebibytes: 8192,
            ..Default::default()
        });

        let record = host.hardware_record().unwrap();
        assert_eq!(record.hostname, "worker-0");
        assert_eq!(record.ram_mebibytes, 8192);

        assert!(InventoryHost::new("worker-1").hardware_record().is_none());
    }

    #[test]
    fn test_has_label() {
        let mut host = InventoryHost::new("worker-0");
        host.labels.insert("tier".into(), "gold".into());

        assert!(host.has_label("tier", "gold"));
        assert!(!host.has_label("tier", "silver"));
        assert!(!host.has_label("zone", "gold"));
    }
}
