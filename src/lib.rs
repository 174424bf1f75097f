//! Hardware Classification Operator
//!
//! Classifies bare-metal hosts against declarative hardware profiles and labels
//! the hosts that match, so schedulers can target them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                            Reconciler                                │
//! │   InventoryProvider ──► Classifier ──► label plan ──► HostLabeler    │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                       Classification Engine                          │
//! │  ┌────────────┐   ┌─────────────────┐   ┌──────────────────────────┐ │
//! │  │ Projector  │──►│ Characteristics │──►│ Classifier (AND of all)  │ │
//! │  └────────────┘   │  range / disks  │   └──────────────────────────┘ │
//! │                   └─────────────────┘                                │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`classification`]: The pure matching engine
//! - [`controlplane`]: Reconciler, label planning, in-memory adapters
//! - [`crd`]: Custom Resource Definitions
//! - [`domain`]: Inventory types and collaborator ports
//! - [`loader`]: Manifest and inventory file loading
//! - [`error`]: Error types and handling

pub mod classification;
pub mod controlplane;
pub mod crd;
pub mod domain;
pub mod error;
pub mod loader;

// Re-export commonly used types
pub use classification::{
    classify, Characteristic, CharacteristicKind, CheckEvent, ClassificationObserver, Classifier,
    MatchOutcome, NoopObserver, OutcomeKind, RecordingObserver, TracingObserver, ValidationError,
};

pub use controlplane::{MemoryInventory, Reconciler, ReconcilerConfig};

pub use crd::{
    HardwareClassification, HardwareClassificationSpec, HardwareClassificationStatus,
    HardwareProfile, ProfileMatchStatus, StatusReason,
};

pub use domain::{
    HostLabeler, InventoryHost, InventoryProvider, MachineHardwareRecord, StorageDevice,
};

pub use error::{Error, ErrorAction, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
