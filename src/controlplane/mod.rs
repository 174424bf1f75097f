//! Control Plane Module
//!
//! Routes classification outcomes to the label and status collaborators.

pub mod labels;
pub mod memory;
pub mod reconciler;

pub use labels::*;
pub use memory::*;
pub use reconciler::*;
