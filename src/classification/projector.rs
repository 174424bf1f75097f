//! Hardware Projector
//!
//! Reduces raw inventory records to the fields a profile actually constrains,
//! normalizing units on the way. Fields of unconstrained dimensions are left at
//! their zero value.

use crate::classification::units::mebibytes_to_gibibytes;
use crate::crd::HardwareProfile;
use crate::domain::{CpuInfo, FirmwareInfo, MachineHardwareRecord, StorageDevice, SystemVendorInfo};
use serde::Serialize;

/// Normalized view of one machine, ready for evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedHardware {
    /// Always populated
    pub hostname: String,
    pub cpu: CpuInfo,
    pub ram_gibibytes: i64,
    pub nic_count: i32,
    /// Device sizes stay in bytes
    pub storage: Vec<StorageDevice>,
    pub firmware: FirmwareInfo,
    pub system_vendor: SystemVendorInfo,
}

/// Project every machine in the inventory
pub fn project(
    profile: &HardwareProfile,
    inventory: &[MachineHardwareRecord],
) -> Vec<ProjectedHardware> {
    inventory
        .iter()
        .map(|record| project_machine(profile, record))
        .collect()
}

/// Project one machine
pub fn project_machine(profile: &HardwareProfile, record: &MachineHardwareRecord) -> ProjectedHardware {
    let mut projected = ProjectedHardware {
        hostname: record.hostname.clone(),
        ..Default::default()
    };

    if profile.cpu.is_some() {
        projected.cpu = record.cpu.clone();
    }
    if profile.ram.is_some() {
        projected.ram_gibibytes = mebibytes_to_gibibytes(record.ram_mebibytes);
    }
    if profile.nic.is_some() {
        projected.nic_count = record.nic_count();
    }
    if profile.disk.is_some() {
        projected.storage = record.storage.clone();
    }
    if profile.firmware.is_some() {
        projected.firmware = record.firmware.clone();
    }
    if profile.system_vendor.is_some() {
        projected.system_vendor = record.system_vendor.clone();
    }

    projected
}
