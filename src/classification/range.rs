//! Inclusive range checks for counts and capacities.
//!
//! A bound that is zero or negative is unset. With both bounds unset every
//! value is in range.

use std::fmt::Display;

/// True when `actual` lies within `[min, max]`, ignoring unset bounds
#[inline]
pub fn in_range<T>(min: T, max: T, actual: T) -> bool
where
    T: PartialOrd + Default,
{
    let unset = T::default();
    if min > unset && actual < min {
        return false;
    }
    if max > unset && actual > max {
        return false;
    }
    true
}

/// True when at least one side of the range is set
#[inline]
pub fn is_bounded<T>(min: T, max: T) -> bool
where
    T: PartialOrd + Default,
{
    let unset = T::default();
    min > unset || max > unset
}

/// Render a range for diagnostics, e.g. `4..=8`, `4..`, `..=8` or `any`
pub fn describe_bounds<T>(min: T, max: T) -> String
where
    T: PartialOrd + Default + Display,
{
    let unset = T::default();
    match (min > unset, max > unset) {
        (true, true) => format!("{}..={}", min, max),
        (true, false) => format!("{}..", min),
        (false, true) => format!("..={}", max),
        (false, false) => "any".to_string(),
    }
}
