//! HardwareClassification Reconciler
//!
//! Fetches the inventory for a profile's namespace, classifies it, brings host
//! labels in line with the result and returns the status to persist.

use crate::classification::{validate, Classifier, MatchOutcome};
use crate::controlplane::labels::{
    label_key, plan_label_changes, LabelChange, DEFAULT_LABEL_PREFIX, DEFAULT_LABEL_VALUE,
};
use crate::crd::{
    HardwareClassification, HardwareClassificationStatus, ProfileMatchStatus, StatusReason,
};
use crate::domain::{HostLabelerRef, InventoryHost, InventoryProviderRef, MachineHardwareRecord};
use kube::ResourceExt;
use tracing::{debug, info, warn};

// =============================================================================
// Reconciler Configuration
// =============================================================================

/// Configuration for the reconciler
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Prefix of the per-profile label key
    pub label_prefix: String,
    /// Value written on matched hosts
    pub label_value: String,
    /// Namespace used for profiles that carry none
    pub default_namespace: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            label_value: DEFAULT_LABEL_VALUE.to_string(),
            default_namespace: "default".to_string(),
        }
    }
}

// =============================================================================
// Reconciler
// =============================================================================

/// Drives one HardwareClassification to its observed state
pub struct Reconciler {
    config: ReconcilerConfig,
    classifier: Classifier,
    inventory: InventoryProviderRef,
    labeler: HostLabelerRef,
}

impl Reconciler {
    /// Create a reconciler with the default tracing classifier
    pub fn new(
        config: ReconcilerConfig,
        inventory: InventoryProviderRef,
        labeler: HostLabelerRef,
    ) -> Self {
        Self {
            config,
            classifier: Classifier::new(),
            inventory,
            labeler,
        }
    }

    /// Replace the classifier (e.g. to attach a recording observer)
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Reconcile a profile and return its new status.
    ///
    /// Classification outcomes never surface as errors; collaborator failures
    /// are folded into the status reason.
    pub async fn reconcile(&self, hc: &HardwareClassification) -> HardwareClassificationStatus {
        let name = hc.name_any();
        let namespace = hc
            .namespace()
            .unwrap_or_else(|| self.config.default_namespace.clone());

        info!(profile = %name, namespace = %namespace, "reconciling hardware classification");

        if let Err(err) = validate(hc.profile()) {
            warn!(profile = %name, error = %err, "hardware profile is misconfigured");
            return HardwareClassificationStatus::new(
                ProfileMatchStatus::Empty,
                StatusReason::ProfileMisconfigured,
                err.to_string(),
                Vec::new(),
            );
        }

        let hosts = match self.inventory.list_hosts(&namespace).await {
            Ok(hosts) => hosts,
            Err(err) => {
                warn!(namespace = %namespace, error = %err, "failed to fetch inventory");
                return HardwareClassificationStatus::new(
                    ProfileMatchStatus::Empty,
                    StatusReason::FetchInventoryFailure,
                    err.to_string(),
                    Vec::new(),
                );
            }
        };

        let records = introspected_records(&hosts);
        debug!(
            namespace = %namespace,
            hosts = hosts.len(),
            introspected = records.len(),
            "fetched inventory"
        );

        let outcome = self.classifier.classify(hc.profile(), &records);
        match outcome {
            MatchOutcome::Misconfigured { .. } | MatchOutcome::EmptyInventory { .. } => {
                status_for(&outcome)
            }
            MatchOutcome::Matched { .. } | MatchOutcome::Unmatched => {
                let key = label_key(&self.config.label_prefix, &name);
                let failures = self
                    .apply_labels(&namespace, &hosts, outcome.hostnames(), &key)
                    .await;

                if failures.is_empty() {
                    status_for(&outcome)
                } else {
                    HardwareClassificationStatus::new(
                        ProfileMatchStatus::Empty,
                        StatusReason::LabelUpdateFailure,
                        failures.join(","),
                        Vec::new(),
                    )
                }
            }
        }
    }

    /// Apply the label plan, returning one message per failed host
    async fn apply_labels(
        &self,
        namespace: &str,
        hosts: &[InventoryHost],
        matched: &[String],
        key: &str,
    ) -> Vec<String> {
        let value = &self.config.label_value;
        let changes = plan_label_changes(hosts, matched, key, value);
        debug!(key = %key, changes = changes.len(), "applying classification labels");

        let mut failures = Vec::new();
        for change in changes {
            let result = match &change {
                LabelChange::Set { host } => {
                    self.labeler.set_label(namespace, host, key, value).await
                }
                LabelChange::Remove { host } => {
                    self.labeler.remove_label(namespace, host, key).await
                }
            };
            if let Err(err) = result {
                warn!(host = %change.host(), key = %key, error = %err, "label update failed");
                failures.push(format!("{}: {}", change.host(), err));
            }
        }
        failures
    }
}

/// Hardware records of the hosts that have been introspected
fn introspected_records(hosts: &[InventoryHost]) -> Vec<MachineHardwareRecord> {
    hosts.iter().filter_map(InventoryHost::hardware_record).collect()
}

/// Status for an outcome that needed no label writes or whose writes succeeded
pub fn status_for(outcome: &MatchOutcome) -> HardwareClassificationStatus {
    HardwareClassificationStatus::new(
        outcome.match_status(),
        outcome.status_reason(),
        outcome.message(),
        outcome.hostnames().to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controlplane::memory::MemoryInventory;
    use crate::crd::{CpuConstraint, HardwareClassificationSpec, HardwareProfile};
    use crate::domain::{CpuInfo, HostLabeler, InventoryProvider};
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Arc;

    const NS: &str = "metal3";
    const KEY: &str = "hardwareclassification.metal3.io/compute";

    fn profile(min_cpus: i32) -> HardwareClassification {
        let mut hc = HardwareClassification::new(
            "compute",
            HardwareClassificationSpec {
                hardware_characteristics: HardwareProfile {
                    cpu: Some(CpuConstraint {
                        minimum_count: min_cpus,
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            },
        );
        hc.metadata.namespace = Some(NS.to_string());
        hc
    }

    fn host(name: &str, cpus: i32) -> InventoryHost {
        InventoryHost::new(name).with_hardware(MachineHardwareRecord {
            cpu: CpuInfo {
                count: cpus,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn reconciler(inventory: Arc<MemoryInventory>) -> Reconciler {
        Reconciler::new(ReconcilerConfig::default(), inventory.clone(), inventory)
    }

    struct BrokenInventory;

    #[async_trait]
    impl InventoryProvider for BrokenInventory {
        async fn list_hosts(&self, namespace: &str) -> Result<Vec<InventoryHost>> {
            Err(Error::InventoryFetch {
                namespace: namespace.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    struct RejectingLabeler;

    #[async_trait]
    impl HostLabeler for RejectingLabeler {
        async fn set_label(&self, _: &str, host: &str, key: &str, _: &str) -> Result<()> {
            Err(Error::LabelUpdate {
                host: host.to_string(),
                key: key.to_string(),
                reason: "forbidden".to_string(),
            })
        }

        async fn remove_label(&self, _: &str, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_matched_hosts_are_labeled() {
        let inventory = Arc::new(MemoryInventory::with_hosts(
            NS,
            vec![host("big", 16), host("small", 2), InventoryHost::new("new")],
        ));
        let mut stale = host("stale", 1);
        stale.labels.insert(KEY.to_string(), "matches".to_string());
        inventory.upsert_host(NS, stale);

        let status = reconciler(inventory.clone()).reconcile(&profile(8)).await;

        assert_eq!(status.profile_match_status, ProfileMatchStatus::Matched);
        assert_eq!(status.reason, Some(StatusReason::Matched));
        assert_eq!(status.matched_hosts, vec!["big".to_string()]);
        assert_eq!(
            inventory.labels_of(NS, "big").unwrap().get(KEY).map(String::as_str),
            Some("matches")
        );
        assert!(inventory.labels_of(NS, "small").unwrap().is_empty());
        assert!(inventory.labels_of(NS, "stale").unwrap().is_empty());
        assert!(inventory.labels_of(NS, "new").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let inventory = Arc::new(MemoryInventory::with_hosts(NS, vec![host("big", 16)]));
        let reconciler = reconciler(inventory.clone());

        let first = reconciler.reconcile(&profile(8)).await;
        let labels = inventory.labels_of(NS, "big");
        let second = reconciler.reconcile(&profile(8)).await;

        assert_eq!(first.matched_hosts, second.matched_hosts);
        assert_eq!(first.reason, second.reason);
        assert_eq!(inventory.labels_of(NS, "big"), labels);
    }

    #[tokio::test]
    async fn test_unmatched_removes_labels() {
        let mut labeled = host("small", 2);
        labeled.labels.insert(KEY.to_string(), "matches".to_string());
        let inventory = Arc::new(MemoryInventory::with_hosts(NS, vec![labeled]));

        let status = reconciler(inventory.clone()).reconcile(&profile(8)).await;

        assert_eq!(status.profile_match_status, ProfileMatchStatus::Unmatched);
        assert_eq!(status.reason, Some(StatusReason::NoValidHostFound));
        assert!(inventory.labels_of(NS, "small").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_misconfigured_profile() {
        let inventory = Arc::new(MemoryInventory::with_hosts(NS, vec![host("big", 16)]));
        let mut hc = profile(8);
        hc.spec.hardware_characteristics = HardwareProfile::default();

        let status = reconciler(inventory.clone()).reconcile(&hc).await;

        assert_eq!(status.profile_match_status, ProfileMatchStatus::Empty);
        assert_eq!(status.reason, Some(StatusReason::ProfileMisconfigured));
        assert!(inventory.labels_of(NS, "big").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_introspected_hosts() {
        let inventory = Arc::new(MemoryInventory::with_hosts(
            NS,
            vec![InventoryHost::new("pending")],
        ));

        let status = reconciler(inventory).reconcile(&profile(8)).await;

        assert_eq!(status.profile_match_status, ProfileMatchStatus::Empty);
        assert_eq!(status.reason, Some(StatusReason::NoInventoryHosts));
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let reconciler = Reconciler::new(
            ReconcilerConfig::default(),
            Arc::new(BrokenInventory),
            Arc::new(MemoryInventory::new()),
        );

        let status = reconciler.reconcile(&profile(8)).await;

        assert_eq!(status.reason, Some(StatusReason::FetchInventoryFailure));
        assert!(status.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_label_failures_are_reported() {
        let inventory = Arc::new(MemoryInventory::with_hosts(
            NS,
            vec![host("a", 16), host("b", 16)],
        ));
        let reconciler = Reconciler::new(
            ReconcilerConfig::default(),
            inventory,
            Arc::new(RejectingLabeler),
        );

        let status = reconciler.reconcile(&profile(8)).await;

        assert_eq!(status.profile_match_status, ProfileMatchStatus::Empty);
        assert_eq!(status.reason, Some(StatusReason::LabelUpdateFailure));
        assert!(status.matched_hosts.is_empty());
        assert_eq!(status.message.split(',').count(), 2);
        assert!(status.message.starts_with("a: "));
    }

    #[tokio::test]
    async fn test_custom_label_prefix() {
        let inventory = Arc::new(MemoryInventory::with_hosts(NS, vec![host("big", 16)]));
        let config = ReconcilerConfig {
            label_prefix: "example.com".to_string(),
            label_value: "yes".to_string(),
            ..Default::default()
        };
        let reconciler = Reconciler::new(config, inventory.clone(), inventory.clone());

        reconciler.reconcile(&profile(8)).await;

        let labels = inventory.labels_of(NS, "big").unwrap();
        assert_eq!(labels.get("example.com/compute").map(String::as_str), Some("yes"));
    }
}
