//! Classifier
//!
//! Runs a profile over an inventory snapshot. A machine matches when every
//! active characteristic passes; there is no partial credit.

use crate::classification::characteristics::Characteristic;
use crate::classification::observer::{ClassificationObserver, TracingObserver};
use crate::classification::projector::{project, ProjectedHardware};
use crate::classification::validation::validate;
use crate::crd::{HardwareProfile, ProfileMatchStatus, StatusReason};
use crate::domain::MachineHardwareRecord;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Message for an inventory with no introspected hosts
pub const NO_INVENTORY_HOSTS: &str = "no introspected hosts found in inventory";

/// Message for a run where no host satisfied the profile
pub const NO_VALID_HOST_FOUND: &str = "no host satisfied the hardware profile";

// =============================================================================
// Outcome
// =============================================================================

/// Terminal state of a classification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeKind {
    Matched,
    Unmatched,
    Misconfigured,
    EmptyInventory,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Matched => write!(f, "Matched"),
            OutcomeKind::Unmatched => write!(f, "Unmatched"),
            OutcomeKind::Misconfigured => write!(f, "Misconfigured"),
            OutcomeKind::EmptyInventory => write!(f, "EmptyInventory"),
        }
    }
}

/// Result of classifying an inventory against a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MatchOutcome {
    /// Hostnames in inventory order
    Matched { hostnames: Vec<String> },
    Unmatched,
    Misconfigured { reason: String },
    EmptyInventory { reason: String },
}

impl MatchOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            MatchOutcome::Matched { .. } => OutcomeKind::Matched,
            MatchOutcome::Unmatched => OutcomeKind::Unmatched,
            MatchOutcome::Misconfigured { .. } => OutcomeKind::Misconfigured,
            MatchOutcome::EmptyInventory { .. } => OutcomeKind::EmptyInventory,
        }
    }

    /// Matched hostnames; empty for every other outcome
    pub fn hostnames(&self) -> &[String] {
        match self {
            MatchOutcome::Matched { hostnames } => hostnames,
            _ => &[],
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    /// Status reason recorded for this outcome
    pub fn status_reason(&self) -> StatusReason {
        match self {
            MatchOutcome::Matched { .. } => StatusReason::Matched,
            MatchOutcome::Unmatched => StatusReason::NoValidHostFound,
            MatchOutcome::Misconfigured { .. } => StatusReason::ProfileMisconfigured,
            MatchOutcome::EmptyInventory { .. } => StatusReason::NoInventoryHosts,
        }
    }

    /// Profile match status recorded for this outcome
    pub fn match_status(&self) -> ProfileMatchStatus {
        match self {
            MatchOutcome::Matched { .. } => ProfileMatchStatus::Matched,
            MatchOutcome::Unmatched => ProfileMatchStatus::Unmatched,
            MatchOutcome::Misconfigured { .. } | MatchOutcome::EmptyInventory { .. } => {
                ProfileMatchStatus::Empty
            }
        }
    }

    /// Human readable detail
    pub fn message(&self) -> String {
        match self {
            MatchOutcome::Matched { hostnames } => {
                format!("{} host(s) matched the hardware profile", hostnames.len())
            }
            MatchOutcome::Unmatched => NO_VALID_HOST_FOUND.to_string(),
            MatchOutcome::Misconfigured { reason } | MatchOutcome::EmptyInventory { reason } => {
                reason.clone()
            }
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Classify an inventory snapshot against a profile
pub fn classify(
    profile: &HardwareProfile,
    inventory: &[MachineHardwareRecord],
    observer: &dyn ClassificationObserver,
) -> MatchOutcome {
    if let Err(err) = validate(profile) {
        return MatchOutcome::Misconfigured {
            reason: err.to_string(),
        };
    }

    if inventory.is_empty() {
        return MatchOutcome::EmptyInventory {
            reason: NO_INVENTORY_HOSTS.to_string(),
        };
    }

    let characteristics = profile.characteristics();
    let hostnames: Vec<String> = project(profile, inventory)
        .into_iter()
        .filter(|machine| machine_matches(&characteristics, machine, observer))
        .map(|machine| machine.hostname)
        .collect();

    if hostnames.is_empty() {
        MatchOutcome::Unmatched
    } else {
        MatchOutcome::Matched { hostnames }
    }
}

/// True when the machine passes every characteristic
pub fn machine_matches(
    characteristics: &[Characteristic<'_>],
    machine: &ProjectedHardware,
    observer: &dyn ClassificationObserver,
) -> bool {
    characteristics
        .iter()
        .all(|characteristic| characteristic.evaluate(machine, observer))
}

// =============================================================================
// Classifier
// =============================================================================

/// Classification engine bound to a diagnostics observer
#[derive(Clone)]
pub struct Classifier {
    observer: Arc<dyn ClassificationObserver>,
}

impl Classifier {
    /// Create a classifier that reports diagnostics through `tracing`
    pub fn new() -> Self {
        Self {
            observer: Arc::new(TracingObserver),
        }
    }

    /// Create a classifier with a custom observer
    pub fn with_observer(observer: Arc<dyn ClassificationObserver>) -> Self {
        Self { observer }
    }

    /// Classify an inventory snapshot against a profile
    pub fn classify(
        &self,
        profile: &HardwareProfile,
        inventory: &[MachineHardwareRecord],
    ) -> MatchOutcome {
        debug!(
            characteristics = profile.active_count(),
            hosts = inventory.len(),
            "classifying inventory"
        );

        let outcome = classify(profile, inventory, self.observer.as_ref());

        info!(
            outcome = %outcome.kind(),
            matched = outcome.hostnames().len(),
            hosts = inventory.len(),
            "classification finished"
        );
        outcome
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
