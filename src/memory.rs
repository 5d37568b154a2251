//! Memory unit helpers.
//!
//! Custom machine type identifiers always express memory in megabytes.
//! Callers that think in gigabytes convert with [`gb_to_mb`] first.

/// Megabytes in one gigabyte as the provider counts them.
pub const MB_PER_GB: u64 = 1024;

/// Memory sizes must be a whole number of these blocks.
pub const MEMORY_GRANULARITY_MB: u64 = 256;

/// Converts gigabytes to megabytes, saturating on overflow.
///
/// A saturated value is never a multiple of [`MEMORY_GRANULARITY_MB`], so it
/// is rejected by validation instead of wrapping to a small size.
#[must_use]
pub const fn gb_to_mb(value: u64) -> u64 {
    value.saturating_mul(MB_PER_GB)
}

/// Returns `true` when `memory_mb` is a whole number of 256 MB blocks.
#[must_use]
pub const fn is_granular(memory_mb: u64) -> bool {
    memory_mb.is_multiple_of(MEMORY_GRANULARITY_MB)
}
