//! Classification Diagnostics
//!
//! Evaluators report every bounded check (expected vs. actual, per host) to a
//! [`ClassificationObserver`] passed in by the caller.

use crate::classification::characteristics::CharacteristicKind;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

// =============================================================================
// Events
// =============================================================================

/// Result of a single comparison made while evaluating a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckEvent {
    pub hostname: String,
    pub characteristic: CharacteristicKind,
    /// What was compared (e.g. `count`, `sizeBytes`)
    pub check: String,
    /// Storage device the check applied to, for per-disk checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// Overall result of one characteristic for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictEvent {
    pub hostname: String,
    pub characteristic: CharacteristicKind,
    pub passed: bool,
}

// =============================================================================
// Observer Trait
// =============================================================================

/// Receives diagnostics from a classification run
pub trait ClassificationObserver: Send + Sync {
    /// Called for every bounded comparison
    fn record(&self, event: CheckEvent);

    /// Called once per evaluated characteristic
    fn verdict(&self, _event: VerdictEvent) {}
}

/// Discards all diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ClassificationObserver for NoopObserver {
    fn record(&self, _event: CheckEvent) {}
}

/// Forwards diagnostics to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ClassificationObserver for TracingObserver {
    fn record(&self, event: CheckEvent) {
        debug!(
            host = %event.hostname,
            characteristic = %event.characteristic,
            check = %event.check,
            device = event.device.as_deref().unwrap_or(""),
            expected = %event.expected,
            actual = %event.actual,
            ok = event.passed,
            "hardware check"
        );
    }

    fn verdict(&self, event: VerdictEvent) {
        debug!(
            host = %event.hostname,
            characteristic = %event.characteristic,
            ok = event.passed,
            "characteristic evaluated"
        );
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    checks: Mutex<Vec<CheckEvent>>,
    verdicts: Mutex<Vec<VerdictEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded checks, in evaluation order
    pub fn checks(&self) -> Vec<CheckEvent> {
        self.checks.lock().clone()
    }

    /// All recorded verdicts, in evaluation order
    pub fn verdicts(&self) -> Vec<VerdictEvent> {
        self.verdicts.lock().clone()
    }

    /// Checks recorded for one host
    pub fn checks_for(&self, hostname: &str) -> Vec<CheckEvent> {
        self.checks
            .lock()
            .iter()
            .filter(|e| e.hostname == hostname)
            .cloned()
            .collect()
    }

    /// Checks that did not pass
    pub fn failures(&self) -> Vec<CheckEvent> {
        self.checks
            .lock()
            .iter()
            .filter(|e| !e.passed)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.checks.lock().clear();
        self.verdicts.lock().clear();
    }
}

impl ClassificationObserver for RecordingObserver {
    fn record(&self, event: CheckEvent) {
        self.checks.lock().push(event);
    }

    fn verdict(&self, event: VerdictEvent) {
        self.verdicts.lock().push(event);
    }
}
