//! HardwareClassification CRD
//!
//! A declarative hardware profile. Every constraint block is optional; an
//! absent block leaves that hardware dimension unconstrained. Within a block,
//! any bound that is zero or negative means "no bound on that side".

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// HardwareClassification CRD
// =============================================================================

/// HardwareClassification matches bare-metal hosts against a hardware profile
/// and labels the hosts that satisfy it.
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "metal3.io",
    version = "v1alpha1",
    kind = "HardwareClassification",
    plural = "hardwareclassifications",
    shortname = "hwc",
    status = "HardwareClassificationStatus",
    printcolumn = r#"{"name": "ProfileMatchStatus", "type": "string", "jsonPath": ".status.profileMatchStatus"}"#,
    printcolumn = r#"{"name": "Reason", "type": "string", "jsonPath": ".status.reason"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HardwareClassificationSpec {
    /// Expected hardware characteristics
    #[serde(default)]
    pub hardware_characteristics: HardwareProfile,
}

// =============================================================================
// Hardware Profile
// =============================================================================

/// Set of optional constraint blocks a host must satisfy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuConstraint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<RamConstraint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nic: Option<NicConstraint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskConstraint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<FirmwareConstraint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_vendor: Option<SystemVendorConstraint>,
}

impl HardwareProfile {
    /// True when no constraint block is set
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of constraint blocks that are set
    pub fn active_count(&self) -> usize {
        [
            self.cpu.is_some(),
            self.ram.is_some(),
            self.nic.is_some(),
            self.disk.is_some(),
            self.firmware.is_some(),
            self.system_vendor.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// CPU count and clock speed bounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CpuConstraint {
    #[serde(default)]
    pub minimum_count: i32,

    #[serde(default)]
    pub maximum_count: i32,

    #[serde(default, rename = "minimumSpeedMHz")]
    pub minimum_speed_mhz: i32,

    #[serde(default, rename = "maximumSpeedMHz")]
    pub maximum_speed_mhz: i32,
}

/// RAM size bounds, in gibibytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RamConstraint {
    #[serde(default, rename = "minimumSizeGB")]
    pub minimum_size_gb: i64,

    #[serde(default, rename = "maximumSizeGB")]
    pub maximum_size_gb: i64,
}

/// Network interface count bounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NicConstraint {
    #[serde(default)]
    pub minimum_count: i32,

    #[serde(default)]
    pub maximum_count: i32,
}

/// Disk count and per-disk size bounds, optionally narrowed by selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiskConstraint {
    #[serde(default)]
    pub minimum_count: i32,

    #[serde(default)]
    pub maximum_count: i32,

    /// Decimal gigabytes
    #[serde(default, rename = "minimumIndividualSizeGB")]
    pub minimum_individual_size_gb: i64,

    /// Decimal gigabytes
    #[serde(default, rename = "maximumIndividualSizeGB")]
    pub maximum_individual_size_gb: i64,

    /// Restricts which devices take part in the count and size checks
    #[serde(default, rename = "diskSelector", skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<DiskSelector>,
}

/// Selects storage devices by attachment address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiskSelector {
    /// HCTL address, either literal ("0:0:0:0") or with `N` standing for a
    /// non-zero digit ("N:0:0:0")
    #[serde(rename = "hctl")]
    pub location_pattern: String,

    #[serde(default)]
    pub rotational: bool,
}

/// Expected BIOS identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareConstraint {
    #[serde(default)]
    pub bios: BiosConstraint,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiosConstraint {
    #[serde(default)]
    pub vendor: String,

    #[serde(default)]
    pub version: String,
}

/// Expected system vendor identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemVendorConstraint {
    #[serde(default)]
    pub manufacturer: String,

    #[serde(default)]
    pub product_name: String,
}

// =============================================================================
// Status
// =============================================================================

/// Observed result of the last classification run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HardwareClassificationStatus {
    #[serde(default)]
    pub profile_match_status: ProfileMatchStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<StatusReason>,

    /// Human readable detail for the reason
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Hosts that satisfied the profile on the last run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_hosts: Vec<String>,

    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl HardwareClassificationStatus {
    /// Build a status stamped with the current time
    pub fn new(
        profile_match_status: ProfileMatchStatus,
        reason: StatusReason,
        message: impl Into<String>,
        matched_hosts: Vec<String>,
    ) -> Self {
        Self {
            profile_match_status,
            reason: Some(reason),
            message: message.into(),
            matched_hosts,
            last_updated: Some(Utc::now()),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.profile_match_status == ProfileMatchStatus::Matched
    }
}

/// Whether the profile matched any host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ProfileMatchStatus {
    /// Classification did not complete
    #[default]
    Empty,
    Matched,
    Unmatched,
}

impl std::fmt::Display for ProfileMatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileMatchStatus::Empty => write!(f, "Empty"),
            ProfileMatchStatus::Matched => write!(f, "Matched"),
            ProfileMatchStatus::Unmatched => write!(f, "Unmatched"),
        }
    }
}

/// Recognized status reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StatusReason {
    ProfileMisconfigured,
    FetchInventoryFailure,
    NoInventoryHosts,
    NoValidHostFound,
    LabelUpdateFailure,
    Matched,
}

impl std::fmt::Display for StatusReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusReason::ProfileMisconfigured => write!(f, "ProfileMisconfigured"),
            StatusReason::FetchInventoryFailure => write!(f, "FetchInventoryFailure"),
            StatusReason::NoInventoryHosts => write!(f, "NoInventoryHosts"),
            StatusReason::NoValidHostFound => write!(f, "NoValidHostFound"),
            StatusReason::LabelUpdateFailure => write!(f, "LabelUpdateFailure"),
            StatusReason::Matched => write!(f, "Matched"),
        }
    }
}

// =============================================================================
// Implementations
// =============================================================================

impl HardwareClassification {
    /// Get the hardware profile
    pub fn profile(&self) -> &HardwareProfile {
        &self.spec.hardware_characteristics
    }

    /// Check if the last run matched any host
    pub fn is_matched(&self) -> bool {
        self.status
            .as_ref()
            .map(|s| s.is_matched())
            .unwrap_or(false)
    }

    /// Hosts matched on the last run
    pub fn matched_hosts(&self) -> &[String] {
        self.status
            .as_ref()
            .map(|s| s.matched_hosts.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
apiVersion: metal3.io/v1alpha1
kind: HardwareClassification
metadata:
  name: storage-nodes
  namespace: metal3
spec:
  hardwareCharacteristics:
    cpu:
      minimumCount: 8
      maximumSpeedMHz: 3200
    ram:
      minimumSizeGB: 64
    disk:
      minimumCount: 2
      minimumIndividualSizeGB: 400
      diskSelector:
        - hctl: "N:0:0:0"
          rotational: false
    systemVendor:
      manufacturer: Dell Inc.
      productName: PowerEdge R640
"#;

    #[test]
    fn test_parse_manifest() {
        let hc: HardwareClassification = serde_yaml::from_str(MANIFEST).unwrap();
        let profile = hc.profile();

        let cpu = profile.cpu.as_ref().unwrap();
        assert_eq!(cpu.minimum_count, 8);
        assert_eq!(cpu.maximum_count, 0);
        assert_eq!(cpu.maximum_speed_mhz, 3200);

        assert_eq!(profile.ram.as_ref().unwrap().minimum_size_gb, 64);

        let disk = profile.disk.as_ref().unwrap();
        assert_eq!(disk.minimum_individual_size_gb, 400);
        assert_eq!(disk.selectors.len(), 1);
        assert_eq!(disk.selectors[0].location_pattern, "N:0:0:0");
        assert!(!disk.selectors[0].rotational);

        assert!(profile.nic.is_none());
        assert!(profile.firmware.is_none());
        assert_eq!(profile.active_count(), 4);
        assert!(!hc.is_matched());
        assert!(hc.matched_hosts().is_empty());
    }

    #[test]
    fn test_empty_profile() {
        let profile = HardwareProfile::default();
        assert!(profile.is_empty());

        let profile = HardwareProfile {
            nic: Some(NicConstraint::default()),
            ..Default::default()
        };
        assert!(!profile.is_empty());
    }

    #[test]
    fn test_status_serialization() {
        let status = HardwareClassificationStatus::new(
            ProfileMatchStatus::Unmatched,
            StatusReason::NoValidHostFound,
            "no host satisfied the profile",
            vec![],
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["profileMatchStatus"], "Unmatched");
        assert_eq!(json["reason"], "NoValidHostFound");
        assert!(json.get("matchedHosts").is_none());
        assert!(status.last_updated.is_some());
    }

    #[test]
    fn test_status_reason_display() {
        assert_eq!(
            format!("{}", StatusReason::ProfileMisconfigured),
            "ProfileMisconfigured"
        );
        assert_eq!(
            format!("{}", StatusReason::FetchInventoryFailure),
            "FetchInventoryFailure"
        );
        assert_eq!(format!("{}", ProfileMatchStatus::Matched), "Matched");
    }
}
