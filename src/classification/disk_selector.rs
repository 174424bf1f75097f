//! Disk Selector
//!
//! Narrows a machine's storage devices to those whose HCTL address matches a
//! profile's disk selectors.
//!
//! A selector matches a device when its pattern equals the device's address
//! exactly, or when it equals the device's *normalized* address and the
//! rotational flags agree. Normalization replaces each digit `1`-`9` with
//! [`LOCATION_WILDCARD`]; `0` is kept literally, so `"0:0:0:0"` never
//! normalizes to `"N:N:N:N"`.

use crate::crd::DiskSelector;
use crate::domain::StorageDevice;

/// Placeholder a non-zero digit normalizes to
pub const LOCATION_WILDCARD: char = 'N';

/// Normalize an HCTL address for pattern comparison
pub fn normalize_location(location_code: &str) -> String {
    location_code
        .chars()
        .map(|c| match c {
            '1'..='9' => LOCATION_WILDCARD,
            other => other,
        })
        .collect()
}

/// Check whether a single selector picks a device
pub fn selector_matches(selector: &DiskSelector, device: &StorageDevice) -> bool {
    if selector.location_pattern == device.location_code {
        return true;
    }
    selector.location_pattern == normalize_location(&device.location_code)
        && selector.rotational == device.rotational
}

/// Devices picked by any selector.
///
/// Iterates selectors in order, then devices in order. A device picked by
/// several selectors appears once per selector.
pub fn select_disks<'a>(
    selectors: &[DiskSelector],
    devices: &'a [StorageDevice],
) -> Vec<&'a StorageDevice> {
    selectors
        .iter()
        .flat_map(|selector| {
            devices
                .iter()
                .filter(move |device| selector_matches(selector, device))
        })
        .collect()
}
