//! Core library for the `kroy` custom machine type tool.
//!
//! The crate validates custom machine type requests (CPU family, core count
//! and memory) against per-family limits, renders them into the identifier
//! strings the compute API expects, and parses such identifiers back.

pub mod config;
pub mod machine_type;
pub mod memory;
pub mod report;

pub use config::{ConfigError, KroyConfig};
pub use machine_type::{
    CpuFamily, CustomMachineType, CustomMachineTypeBuilder, ErrorKind, FamilyLimits,
    MachineTypeError, MemoryCeiling, SHARED_CORE_COUNT, is_zonal_machine_type,
    qualify_machine_type,
};
pub use memory::{MB_PER_GB, MEMORY_GRANULARITY_MB, gb_to_mb};
pub use report::{FamilyLimitsReport, MachineTypeReport};
