//! Profile Validation
//!
//! A profile is misconfigured when it sets no characteristic, when a range has
//! both bounds set with the minimum above the maximum, or when a disk selector
//! has an empty pattern.

use crate::crd::HardwareProfile;
use thiserror::Error;

/// Reasons a profile cannot be evaluated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("profile sets no hardware characteristics")]
    NoCharacteristics,

    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("disk selector {index} has an empty hctl pattern")]
    EmptySelectorPattern { index: usize },
}

/// Validate a profile, returning the first violation
pub fn validate(profile: &HardwareProfile) -> Result<(), ValidationError> {
    match validate_all(profile).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every violation in the profile
pub fn validate_all(profile: &HardwareProfile) -> Vec<ValidationError> {
    if profile.is_empty() {
        return vec![ValidationError::NoCharacteristics];
    }

    let mut ranges: Vec<(&'static str, i64, i64)> = Vec::new();
    if let Some(cpu) = &profile.cpu {
        ranges.push(("cpu.count", cpu.minimum_count.into(), cpu.maximum_count.into()));
        ranges.push((
            "cpu.speedMHz",
            cpu.minimum_speed_mhz.into(),
            cpu.maximum_speed_mhz.into(),
        ));
    }
    if let Some(ram) = &profile.ram {
        ranges.push(("ram.sizeGB", ram.minimum_size_gb, ram.maximum_size_gb));
    }
    if let Some(nic) = &profile.nic {
        ranges.push(("nic.count", nic.minimum_count.into(), nic.maximum_count.into()));
    }
    if let Some(disk) = &profile.disk {
        ranges.push(("disk.count", disk.minimum_count.into(), disk.maximum_count.into()));
        ranges.push((
            "disk.individualSizeGB",
            disk.minimum_individual_size_gb,
            disk.maximum_individual_size_gb,
        ));
    }

    let mut errors: Vec<ValidationError> = ranges
        .into_iter()
        .filter(|(_, min, max)| *min > 0 && *max > 0 && min > max)
        .map(|(field, min, max)| ValidationError::InvertedRange { field, min, max })
        .collect();

    if let Some(disk) = &profile.disk {
        errors.extend(
            disk.selectors
                .iter()
                .enumerate()
                .filter(|(_, s)| s.location_pattern.is_empty())
                .map(|(index, _)| ValidationError::EmptySelectorPattern { index }),
        );
    }

    errors
}
