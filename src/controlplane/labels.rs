//! Classification Labels
//!
//! Every profile owns one label key, `<prefix>/<profile name>`. Matched hosts
//! carry it; every other host in the namespace must not.

use crate::domain::InventoryHost;

/// Default label key prefix
pub const DEFAULT_LABEL_PREFIX: &str = "hardwareclassification.metal3.io";

/// Default label value for matched hosts
pub const DEFAULT_LABEL_VALUE: &str = "matches";

/// Label key for a profile
pub fn label_key(prefix: &str, profile_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), profile_name)
}

/// A single label write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelChange {
    Set { host: String },
    Remove { host: String },
}

impl LabelChange {
    pub fn host(&self) -> &str {
        match self {
            LabelChange::Set { host } | LabelChange::Remove { host } => host,
        }
    }
}

/// Writes needed so that exactly the `matched` hosts carry `key=value`.
///
/// Hosts already in the desired state produce no change, so applying the same
/// plan twice is a no-op the second time.
pub fn plan_label_changes(
    hosts: &[InventoryHost],
    matched: &[String],
    key: &str,
    value: &str,
) -> Vec<LabelChange> {
    hosts
        .iter()
        .filter_map(|host| {
            let wanted = matched.iter().any(|m| *m == host.name);
            if wanted && !host.has_label(key, value) {
                Some(LabelChange::Set {
                    host: host.name.clone(),
                })
            } else if !wanted && host.labels.contains_key(key) {
                Some(LabelChange::Remove {
                    host: host.name.clone(),
                })
            } else {
                None
            }
        })
        .collect()
}
