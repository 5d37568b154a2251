//! Serialisable views of machine types and family limits.
//!
//! The CLI prints these either as `key=value` lines or as JSON.

use std::fmt::Write as _;

use serde::Serialize;

use crate::machine_type::{CpuFamily, CustomMachineType, FamilyLimits};

/// Flattened description of a [`CustomMachineType`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MachineTypeReport {
    /// Zone, when the identifier carried one.
    pub zone: Option<String>,
    /// CPU family.
    pub family: CpuFamily,
    /// Number of virtual cores.
    pub core_count: u32,
    /// Memory in MB.
    pub memory_mb: u64,
    /// Whether extended memory is in use.
    pub extra_memory: bool,
    /// Canonical identifier.
    pub identifier: String,
    /// Identifier without the zone prefix.
    pub short_type: String,
}

impl From<&CustomMachineType> for MachineTypeReport {
    fn from(value: &CustomMachineType) -> Self {
        Self {
            zone: value.zone().map(str::to_owned),
            family: value.family(),
            core_count: value.core_count(),
            memory_mb: value.memory_mb(),
            extra_memory: value.uses_extra_memory(),
            identifier: value.to_string(),
            short_type: value.short_type(),
        }
    }
}

impl MachineTypeReport {
    /// Renders one `key=value` line per field; an absent zone is left empty.
    #[must_use]
    pub fn to_key_values(&self) -> String {
        let mut out = String::new();
        let zone = self.zone.as_deref().unwrap_or_default();
        // Writing to a String cannot fail.
        writeln!(out, "zone={zone}").ok();
        writeln!(out, "family={}", self.family).ok();
        writeln!(out, "core_count={}", self.core_count).ok();
        writeln!(out, "memory_mb={}", self.memory_mb).ok();
        writeln!(out, "extra_memory={}", self.extra_memory).ok();
        writeln!(out, "identifier={}", self.identifier).ok();
        writeln!(out, "short_type={}", self.short_type).ok();
        out
    }
}

/// Limits of one family in a printable form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FamilyLimitsReport {
    /// CPU family.
    pub family: CpuFamily,
    /// Name prefix used in identifiers.
    pub prefix: &'static str,
    /// Whether the family is pinned to two shared cores.
    pub shared_core: bool,
    /// Permitted core counts; empty when unconstrained.
    pub allowed_core_counts: Vec<u32>,
    /// Lowest memory per core in MB.
    pub min_memory_per_core_mb: u64,
    /// Highest standard memory per core in MB.
    pub max_memory_per_core_mb: u64,
    /// Whether extended memory is available.
    pub allows_extra_memory: bool,
    /// Absolute memory cap with extended memory, in MB.
    pub extra_memory_cap_mb: u64,
}

impl From<CpuFamily> for FamilyLimitsReport {
    fn from(family: CpuFamily) -> Self {
        let limits: &FamilyLimits = family.limits();
        Self {
            family,
            prefix: family.prefix(),
            shared_core: family.is_shared_core(),
            allowed_core_counts: limits.allowed_core_counts(),
            min_memory_per_core_mb: limits.min_memory_per_core_mb,
            max_memory_per_core_mb: limits.max_memory_per_core_mb,
            allows_extra_memory: limits.allows_extra_memory,
            extra_memory_cap_mb: limits.extra_memory_cap_mb,
        }
    }
}

impl FamilyLimitsReport {
    /// Renders the limits as a single summary line.
    #[must_use]
    pub fn to_line(&self) -> String {
        let cores = if self.allowed_core_counts.is_empty() {
            String::from("2 (shared)")
        } else {
            self.allowed_core_counts
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };
        let extra = if self.allows_extra_memory {
            format!("up to {} MB", self.extra_memory_cap_mb)
        } else {
            String::from("no")
        };
        format!(
            "{} prefix={} cores={cores} memory_per_core_mb={}..={} extra_memory={extra}",
            self.family, self.prefix, self.min_memory_per_core_mb, self.max_memory_per_core_mb
        )
    }
}
