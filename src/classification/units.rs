//! Unit conversions between inventory values and profile bounds.
//!
//! RAM is converted once, during projection. Disk sizes stay in bytes on the
//! machine side; profile GB bounds are converted to bytes before comparison.

pub const MEBIBYTES_PER_GIBIBYTE: i64 = 1024;

/// Decimal gigabyte, the unit disk capacities are advertised in
pub const BYTES_PER_GIGABYTE: u64 = 1_000_000_000;

/// Whole gibibytes in `mebibytes` (floor); negative input yields 0
#[inline]
pub fn mebibytes_to_gibibytes(mebibytes: i64) -> i64 {
    mebibytes.max(0) / MEBIBYTES_PER_GIBIBYTE
}

/// Bytes in `gigabytes`; non-positive input yields 0 so an unset bound stays unset
#[inline]
pub fn gigabytes_to_bytes(gigabytes: i64) -> u64 {
    u64::try_from(gigabytes)
        .unwrap_or(0)
        .saturating_mul(BYTES_PER_GIGABYTE)
}
