//! Custom Resource Definitions for the Hardware Classification Operator
//!
//! This module contains the CRD types:
//! - HardwareClassification: a hardware profile and its observed match status

pub mod hardware_classification;

pub use hardware_classification::*;
