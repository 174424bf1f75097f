//! Characteristic Evaluators
//!
//! One evaluator per hardware dimension. A profile's set blocks become
//! [`Characteristic`] values; an unset block produces no characteristic and so
//! never rejects a host.

use crate::classification::disk_selector::select_disks;
use crate::classification::observer::{CheckEvent, ClassificationObserver, VerdictEvent};
use crate::classification::projector::ProjectedHardware;
use crate::classification::range::{describe_bounds, in_range, is_bounded};
use crate::classification::units::gigabytes_to_bytes;
use crate::crd::{
    CpuConstraint, DiskConstraint, FirmwareConstraint, HardwareProfile, NicConstraint,
    RamConstraint, SystemVendorConstraint,
};
use crate::domain::StorageDevice;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

// =============================================================================
// Characteristic Kind
// =============================================================================

/// Hardware dimension a characteristic constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacteristicKind {
    Cpu,
    Ram,
    Nic,
    Disk,
    Firmware,
    SystemVendor,
}

impl std::fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharacteristicKind::Cpu => write!(f, "cpu"),
            CharacteristicKind::Ram => write!(f, "ram"),
            CharacteristicKind::Nic => write!(f, "nic"),
            CharacteristicKind::Disk => write!(f, "disk"),
            CharacteristicKind::Firmware => write!(f, "firmware"),
            CharacteristicKind::SystemVendor => write!(f, "systemVendor"),
        }
    }
}

// =============================================================================
// Characteristic
// =============================================================================

/// An active constraint block of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic<'a> {
    Cpu(&'a CpuConstraint),
    Ram(&'a RamConstraint),
    Nic(&'a NicConstraint),
    Disk(&'a DiskConstraint),
    Firmware(&'a FirmwareConstraint),
    SystemVendor(&'a SystemVendorConstraint),
}

impl HardwareProfile {
    /// Active characteristics, in a fixed evaluation order
    pub fn characteristics(&self) -> Vec<Characteristic<'_>> {
        let mut active = Vec::with_capacity(self.active_count());
        if let Some(cpu) = &self.cpu {
            active.push(Characteristic::Cpu(cpu));
        }
        if let Some(ram) = &self.ram {
            active.push(Characteristic::Ram(ram));
        }
        if let Some(nic) = &self.nic {
            active.push(Characteristic::Nic(nic));
        }
        if let Some(firmware) = &self.firmware {
            active.push(Characteristic::Firmware(firmware));
        }
        if let Some(system_vendor) = &self.system_vendor {
            active.push(Characteristic::SystemVendor(system_vendor));
        }
        if let Some(disk) = &self.disk {
            active.push(Characteristic::Disk(disk));
        }
        active
    }
}

impl Characteristic<'_> {
    pub fn kind(&self) -> CharacteristicKind {
        match self {
            Characteristic::Cpu(_) => CharacteristicKind::Cpu,
            Characteristic::Ram(_) => CharacteristicKind::Ram,
            Characteristic::Nic(_) => CharacteristicKind::Nic,
            Characteristic::Disk(_) => CharacteristicKind::Disk,
            Characteristic::Firmware(_) => CharacteristicKind::Firmware,
            Characteristic::SystemVendor(_) => CharacteristicKind::SystemVendor,
        }
    }

    /// Evaluate this characteristic against one machine
    pub fn evaluate(&self, machine: &ProjectedHardware, observer: &dyn ClassificationObserver) -> bool {
        let probe = Probe {
            hostname: &machine.hostname,
            kind: self.kind(),
            observer,
        };

        let passed = match self {
            Characteristic::Cpu(c) => check_cpu(c, machine, &probe),
            Characteristic::Ram(c) => check_ram(c, machine, &probe),
            Characteristic::Nic(c) => check_nic(c, machine, &probe),
            Characteristic::Disk(c) => check_disk(c, machine, &probe),
            Characteristic::Firmware(c) => check_firmware(c, machine, &probe),
            Characteristic::SystemVendor(c) => check_system_vendor(c, machine, &probe),
        };

        observer.verdict(VerdictEvent {
            hostname: machine.hostname.clone(),
            characteristic: probe.kind,
            passed,
        });
        passed
    }
}

// =============================================================================
// Probe
// =============================================================================

/// Runs comparisons and reports them to the observer
struct Probe<'a> {
    hostname: &'a str,
    kind: CharacteristicKind,
    observer: &'a dyn ClassificationObserver,
}

impl Probe<'_> {
    fn range<T>(&self, check: &str, min: T, max: T, actual: T) -> bool
    where
        T: PartialOrd + Default + Display + Copy,
    {
        self.device_range(check, None, min, max, actual)
    }

    fn device_range<T>(&self, check: &str, device: Option<&str>, min: T, max: T, actual: T) -> bool
    where
        T: PartialOrd + Default + Display + Copy,
    {
        if !is_bounded(min, max) {
            return true;
        }
        let passed = in_range(min, max, actual);
        self.emit(check, device, describe_bounds(min, max), actual.to_string(), passed);
        passed
    }

    fn equals(&self, check: &str, expected: &str, actual: &str) -> bool {
        let passed = expected == actual;
        self.emit(check, None, expected.to_string(), actual.to_string(), passed);
        passed
    }

    fn emit(&self, check: &str, device: Option<&str>, expected: String, actual: String, passed: bool) {
        self.observer.record(CheckEvent {
            hostname: self.hostname.to_string(),
            characteristic: self.kind,
            check: check.to_string(),
            device: device.map(str::to_string),
            expected,
            actual,
            passed,
        });
    }
}

// =============================================================================
// Evaluators
// =============================================================================

fn check_cpu(c: &CpuConstraint, machine: &ProjectedHardware, probe: &Probe<'_>) -> bool {
    probe.range("count", c.minimum_count, c.maximum_count, machine.cpu.count)
        && probe.range(
            "clockSpeedMHz",
            c.minimum_speed_mhz,
            c.maximum_speed_mhz,
            machine.cpu.clock_megahertz,
        )
}

fn check_ram(c: &RamConstraint, machine: &ProjectedHardware, probe: &Probe<'_>) -> bool {
    probe.range("sizeGiB", c.minimum_size_gb, c.maximum_size_gb, machine.ram_gibibytes)
}

fn check_nic(c: &NicConstraint, machine: &ProjectedHardware, probe: &Probe<'_>) -> bool {
    probe.range("count", c.minimum_count, c.maximum_count, machine.nic_count)
}

/// Count and per-device size checks over the selected devices.
///
/// When selectors pick nothing, the checks run against every device.
fn check_disk(c: &DiskConstraint, machine: &ProjectedHardware, probe: &Probe<'_>) -> bool {
    let all: Vec<&StorageDevice> = machine.storage.iter().collect();
    let devices = if c.selectors.is_empty() {
        all
    } else {
        let selected = select_disks(&c.selectors, &machine.storage);
        if selected.is_empty() {
            debug!(
                host = %machine.hostname,
                selectors = c.selectors.len(),
                "no disk matched the selectors, evaluating all disks"
            );
            all
        } else {
            selected
        }
    };

    let count = i32::try_from(devices.len()).unwrap_or(i32::MAX);
    if !probe.range("count", c.minimum_count, c.maximum_count, count) {
        return false;
    }

    let min_bytes = gigabytes_to_bytes(c.minimum_individual_size_gb);
    let max_bytes = gigabytes_to_bytes(c.maximum_individual_size_gb);
    devices.iter().all(|device| {
        probe.device_range(
            "sizeBytes",
            Some(device.name.as_str()),
            min_bytes,
            max_bytes,
            device.size_bytes,
        )
    })
}

/// Fails only when both vendor and version differ.
///
/// This is looser than equality on both fields: a host whose BIOS vendor
/// matches passes regardless of its version, and vice versa.
fn check_firmware(c: &FirmwareConstraint, machine: &ProjectedHardware, probe: &Probe<'_>) -> bool {
    let bios = &machine.firmware.bios;
    let vendor = probe.equals("biosVendor", &c.bios.vendor, &bios.vendor);
    let version = probe.equals("biosVersion", &c.bios.version, &bios.version);
    vendor || version
}

/// Fails only when both manufacturer and product name differ, like firmware.
fn check_system_vendor(
    c: &SystemVendorConstraint,
    machine: &ProjectedHardware,
    probe: &Probe<'_>,
) -> bool {
    let vendor = &machine.system_vendor;
    let manufacturer = probe.equals("manufacturer", &c.manufacturer, &vendor.manufacturer);
    let product = probe.equals("productName", &c.product_name, &vendor.product_name);
    manufacturer || product
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::observer::{NoopObserver, RecordingObserver};
    use crate::crd::{BiosConstraint, DiskSelector};
    use crate::domain::{BiosInfo, CpuInfo, FirmwareInfo, SystemVendorInfo};

    const GB: u64 = 1_000_000_000;

    fn disk(name: &str, hctl: &str, rotational: bool, size_bytes: u64) -> StorageDevice {
        StorageDevice {
            name: name.into(),
            location_code: hctl.into(),
            rotational,
            size_bytes,
        }
    }

    fn machine() -> ProjectedHardware {
        ProjectedHardware {
            hostname: "worker-0".into(),
            cpu: CpuInfo {
                arch: "x86_64".into(),
                count: 8,
                clock_megahertz: 2400,
            },
            ram_gibibytes: 16,
            nic_count: 2,
            storage: vec![
                disk("/dev/sda", "1:0:0:0", false, 480 * GB),
                disk("/dev/sdb", "2:0:0:0", false, 480 * GB),
                disk("/dev/sdc", "0:0:0:1", true, 4_000 * GB),
            ],
            firmware: FirmwareInfo {
                bios: BiosInfo {
                    date: "03/14/2023".into(),
                    vendor: "Dell Inc.".into(),
                    version: "2.17.1".into(),
                },
            },
            system_vendor: SystemVendorInfo {
                manufacturer: "Dell Inc.".into(),
                product_name: "PowerEdge R640".into(),
                serial_number: "ABC123".into(),
            },
        }
    }

    fn eval(characteristic: Characteristic<'_>) -> bool {
        characteristic.evaluate(&machine(), &NoopObserver)
    }

    #[test]
    fn test_cpu() {
        let ok = CpuConstraint {
            minimum_count: 8,
            maximum_count: 16,
            minimum_speed_mhz: 2000,
            maximum_speed_mhz: 2400,
        };
        assert!(eval(Characteristic::Cpu(&ok)));

        let too_few = CpuConstraint {
            minimum_count: 16,
            ..Default::default()
        };
        assert!(!eval(Characteristic::Cpu(&too_few)));

        let too_slow = CpuConstraint {
            minimum_speed_mhz: 3000,
            ..Default::default()
        };
        assert!(!eval(Characteristic::Cpu(&too_slow)));

        assert!(eval(Characteristic::Cpu(&CpuConstraint::default())));
    }

    #[test]
    fn test_ram_in_gibibytes() {
        let ok = RamConstraint {
            minimum_size_gb: 8,
            maximum_size_gb: 32,
        };
        assert!(eval(Characteristic::Ram(&ok)));

        let too_small = RamConstraint {
            minimum_size_gb: 32,
            ..Default::default()
        };
        assert!(!eval(Characteristic::Ram(&too_small)));
    }

    #[test]
    fn test_nic() {
        let ok = NicConstraint {
            minimum_count: 2,
            maximum_count: 2,
        };
        assert!(eval(Characteristic::Nic(&ok)));

        let too_many = NicConstraint {
            minimum_count: 4,
            maximum_count: 0,
        };
        assert!(!eval(Characteristic::Nic(&too_many)));
    }

    #[test]
    fn test_disk_selectors_narrow_devices() {
        let constraint = DiskConstraint {
            minimum_count: 2,
            maximum_count: 2,
            maximum_individual_size_gb: 500,
            selectors: vec![DiskSelector {
                location_pattern: "N:0:0:0".into(),
                rotational: false,
            }],
            ..Default::default()
        };
        // the 4TB HDD is filtered out, so the size cap holds
        assert!(eval(Characteristic::Disk(&constraint)));
    }

    #[test]
    fn test_disk_selector_fallback_uses_all_devices() {
        let constraint = DiskConstraint {
            minimum_count: 3,
            selectors: vec![DiskSelector {
                location_pattern: "9:9:9:9".into(),
                rotational: true,
            }],
            ..Default::default()
        };
        assert!(eval(Characteristic::Disk(&constraint)));

        let capped = DiskConstraint {
            maximum_count: 2,
            ..constraint
        };
        assert!(!eval(Characteristic::Disk(&capped)));
    }

    #[test]
    fn test_disk_size_is_all_or_nothing() {
        let constraint = DiskConstraint {
            minimum_individual_size_gb: 400,
            maximum_individual_size_gb: 1_000,
            ..Default::default()
        };
        assert!(!eval(Characteristic::Disk(&constraint)));

        let roomy = DiskConstraint {
            minimum_individual_size_gb: 480,
            maximum_individual_size_gb: 4_000,
            ..Default::default()
        };
        assert!(eval(Characteristic::Disk(&roomy)));
    }

    #[test]
    fn test_disk_size_reports_each_device() {
        let observer = RecordingObserver::new();
        let constraint = DiskConstraint {
            minimum_individual_size_gb: 100,
            ..Default::default()
        };
        assert!(Characteristic::Disk(&constraint).evaluate(&machine(), &observer));

        let devices: Vec<_> = observer
            .checks()
            .into_iter()
            .filter(|e| e.check == "sizeBytes")
            .filter_map(|e| e.device)
            .collect();
        assert_eq!(devices, vec!["/dev/sda", "/dev/sdb", "/dev/sdc"]);
    }

    #[test]
    fn test_firmware_fails_only_when_both_differ() {
        let both = FirmwareConstraint {
            bios: BiosConstraint {
                vendor: "Dell Inc.".into(),
                version: "2.17.1".into(),
            },
        };
        assert!(eval(Characteristic::Firmware(&both)));

        let vendor_only = FirmwareConstraint {
            bios: BiosConstraint {
                vendor: "Dell Inc.".into(),
                version: "1.0.0".into(),
            },
        };
        assert!(eval(Characteristic::Firmware(&vendor_only)));

        let version_only = FirmwareConstraint {
            bios: BiosConstraint {
                vendor: "HPE".into(),
                version: "2.17.1".into(),
            },
        };
        assert!(eval(Characteristic::Firmware(&version_only)));

        let neither = FirmwareConstraint {
            bios: BiosConstraint {
                vendor: "HPE".into(),
                version: "U46".into(),
            },
        };
        assert!(!eval(Characteristic::Firmware(&neither)));
    }

    #[test]
    fn test_system_vendor_fails_only_when_both_differ() {
        let product_only = SystemVendorConstraint {
            manufacturer: "Supermicro".into(),
            product_name: "PowerEdge R640".into(),
        };
        assert!(eval(Characteristic::SystemVendor(&product_only)));

        let neither = SystemVendorConstraint {
            manufacturer: "Supermicro".into(),
            product_name: "SYS-1029P".into(),
        };
        assert!(!eval(Characteristic::SystemVendor(&neither)));
    }

    #[test]
    fn test_unbounded_checks_are_silent() {
        let observer = RecordingObserver::new();
        let constraint = CpuConstraint {
            minimum_count: 4,
            ..Default::default()
        };
        assert!(Characteristic::Cpu(&constraint).evaluate(&machine(), &observer));

        let checks = observer.checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].check, "count");
        assert_eq!(checks[0].expected, "4..");
        assert_eq!(checks[0].actual, "8");

        let verdicts = observer.verdicts();
        assert_eq!(verdicts.len(), 1);
        assert!(verdicts[0].passed);
    }

    #[test]
    fn test_characteristics_follow_profile() {
        let profile = HardwareProfile {
            nic: Some(NicConstraint::default()),
            disk: Some(DiskConstraint::default()),
            ..Default::default()
        };
        let kinds: Vec<_> = profile.characteristics().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![CharacteristicKind::Nic, CharacteristicKind::Disk]);

        assert!(HardwareProfile::default().characteristics().is_empty());
    }
}
