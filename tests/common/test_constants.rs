//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// Zone used by identifier fixtures.
pub const ZONE: &str = "us-central1-b";

/// Identifier used across parse fixtures, without a zone.
pub const E2_SHORT: &str = "e2-custom-4-8192";

/// The same machine type with its zone path.
pub const E2_ZONAL: &str = "zones/us-central1-b/machineTypes/e2-custom-4-8192";

/// The same machine type as a full API URL.
pub const E2_URL: &str =
    "https://www.googleapis.com/compute/v1/projects/demo/zones/us-central1-b/machineTypes/e2-custom-4-8192";
