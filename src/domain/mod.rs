//! Domain layer - Inventory types and port definitions
//!
//! This module defines the hardware inventory records the classifier reads and
//! the core traits (ports) that adapters implement, following hexagonal
//! architecture principles.

pub mod inventory;
pub mod ports;

pub use inventory::*;
pub use ports::*;
