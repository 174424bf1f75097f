//! Hardware Classification Module
//!
//! Decides which hosts satisfy a hardware profile. Everything here is a pure
//! function of (profile, inventory snapshot): no I/O and no shared state.
//!
//! Data flow:
//!
//! ```text
//! profile + inventory ──► projector ──► characteristics ──► classifier ──► MatchOutcome
//!                                        (range, disk_selector)
//! ```

pub mod characteristics;
pub mod classifier;
pub mod disk_selector;
pub mod observer;
pub mod projector;
pub mod range;
pub mod units;
pub mod validation;

pub use characteristics::*;
pub use classifier::*;
pub use disk_selector::*;
pub use observer::*;
pub use projector::*;
pub use range::*;
pub use units::*;
pub use validation::*;
