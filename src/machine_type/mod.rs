//! Custom machine types: validation against family limits and the provider's
//! identifier format.
//!
//! A [`CustomMachineType`] can only be obtained through a validating
//! constructor, so every value in circulation satisfies its family's limits
//! and renders to an identifier the provider accepts.

mod error;
mod family;
mod identifier;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::memory::{gb_to_mb, is_granular};

pub use error::{ErrorKind, MachineTypeError, MemoryCeiling};
pub use family::{CpuFamily, FamilyLimits, SHARED_CORE_COUNT};
pub use identifier::{is_zonal_machine_type, qualify_machine_type};

/// A validated custom machine type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomMachineType {
    zone: Option<String>,
    family: CpuFamily,
    core_count: u32,
    memory_mb: u64,
    extra_memory: bool,
}

impl CustomMachineType {
    /// Validates the requested shape and returns the machine type.
    ///
    /// Shared-core families ignore `core_count` and always use
    /// [`SHARED_CORE_COUNT`]. A blank `zone` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in this order:
    /// [`MachineTypeError::InvalidCoreCount`],
    /// [`MachineTypeError::InvalidMemoryGranularity`],
    /// [`MachineTypeError::MemoryTooLow`] and
    /// [`MachineTypeError::MemoryTooHigh`].
    pub fn new(
        zone: Option<String>,
        family: CpuFamily,
        memory_mb: u64,
        core_count: u32,
    ) -> Result<Self, MachineTypeError> {
        let cores = if family.is_shared_core() {
            SHARED_CORE_COUNT
        } else {
            core_count
        };

        let extra_memory = check_limits(family, cores, memory_mb).inspect_err(|err| {
            debug!(%family, cores, memory_mb, error = %err, "rejected custom machine type");
        })?;

        Ok(Self {
            zone: zone
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            family,
            core_count: cores,
            memory_mb,
            extra_memory,
        })
    }

    /// Starts a builder for a machine type of the given family.
    #[must_use]
    pub const fn builder(family: CpuFamily) -> CustomMachineTypeBuilder {
        CustomMachineTypeBuilder::new(family)
    }

    /// Parses an identifier in any of the accepted shapes.
    ///
    /// Full URLs and `zones/<zone>/machineTypes/<name>` paths keep their zone;
    /// a bare `<name>` yields a machine type without one. A trailing `-ext`
    /// is accepted but not trusted; extended memory is derived from the
    /// parsed cores and memory.
    ///
    /// # Errors
    ///
    /// Returns [`MachineTypeError::MalformedIdentifier`] or
    /// [`MachineTypeError::UnknownCpuFamily`] for identifiers that do not fit
    /// the grammar, and any error [`CustomMachineType::new`] raises for
    /// well-formed identifiers outside the family limits.
    pub fn parse(value: &str) -> Result<Self, MachineTypeError> {
        let parsed = identifier::parse(value)?;
        debug!(
            identifier = value,
            family = %parsed.family,
            cores = parsed.core_count,
            memory_mb = parsed.memory_mb,
            "parsed machine type identifier"
        );

        Self::new(
            parsed.zone.map(str::to_owned),
            parsed.family,
            parsed.memory_mb,
            parsed.core_count,
        )
    }

    /// Zone the machine type belongs to, when known.
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// CPU family.
    #[must_use]
    pub const fn family(&self) -> CpuFamily {
        self.family
    }

    /// Number of virtual cores.
    #[must_use]
    pub const fn core_count(&self) -> u32 {
        self.core_count
    }

    /// Memory in MB.
    #[must_use]
    pub const fn memory_mb(&self) -> u64 {
        self.memory_mb
    }

    /// Whether memory exceeds the family's standard per-core ratio.
    #[must_use]
    pub const fn uses_extra_memory(&self) -> bool {
        self.extra_memory
    }

    /// Limits of this machine type's family.
    #[must_use]
    pub const fn limits(&self) -> &'static FamilyLimits {
        self.family.limits()
    }

    /// Returns a copy placed in `zone`.
    #[must_use]
    pub fn in_zone(self, zone: impl Into<String>) -> Self {
        let value = zone.into().trim().to_owned();
        Self {
            zone: Some(value).filter(|z| !z.is_empty()),
            ..self
        }
    }

    /// Identifier without the zone prefix, for example `n2-custom-4-10240`.
    ///
    /// Instance templates take the machine type in this form.
    #[must_use]
    pub fn short_type(&self) -> String {
        ShortType(self).to_string()
    }
}

/// Runs the limit checks and reports whether extended memory is in use.
fn check_limits(family: CpuFamily, cores: u32, memory_mb: u64) -> Result<bool, MachineTypeError> {
    let limits = family.limits();

    if !limits.permits_core_count(cores) {
        return Err(MachineTypeError::InvalidCoreCount {
            family,
            requested: cores,
            allowed: limits.allowed_core_counts(),
        });
    }

    if !is_granular(memory_mb) {
        return Err(MachineTypeError::InvalidMemoryGranularity { memory_mb });
    }

    if memory_mb < limits.min_memory_mb(cores) {
        return Err(MachineTypeError::MemoryTooLow {
            family,
            memory_mb,
            min_per_core_mb: limits.min_memory_per_core_mb,
        });
    }

    if memory_mb <= limits.max_standard_memory_mb(cores) {
        return Ok(false);
    }

    if !limits.allows_extra_memory {
        return Err(MachineTypeError::MemoryTooHigh {
            family,
            memory_mb,
            ceiling: MemoryCeiling::PerCore(limits.max_memory_per_core_mb),
        });
    }

    if memory_mb > limits.extra_memory_cap_mb {
        return Err(MachineTypeError::MemoryTooHigh {
            family,
            memory_mb,
            ceiling: MemoryCeiling::Absolute(limits.extra_memory_cap_mb),
        });
    }

    Ok(true)
}

/// Renders the trailing `<name>` segment of an identifier.
struct ShortType<'a>(&'a CustomMachineType);

impl fmt::Display for ShortType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machine_type = self.0;
        let prefix = machine_type.family.prefix();
        if machine_type.family.is_shared_core() {
            return write!(f, "{prefix}-{}", machine_type.memory_mb);
        }
        write!(
            f,
            "{prefix}-{}-{}",
            machine_type.core_count, machine_type.memory_mb
        )?;
        if machine_type.extra_memory {
            f.write_str("-ext")?;
        }
        Ok(())
    }
}

impl fmt::Display for CustomMachineType {
    /// Writes `zones/<zone>/machineTypes/<name>`, or just `<name>` when the
    /// zone is unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(zone) = &self.zone {
            write!(f, "zones/{zone}/machineTypes/")?;
        }
        fmt::Display::fmt(&ShortType(self), f)
    }
}

impl FromStr for CustomMachineType {
    type Err = MachineTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Builder for [`CustomMachineType`]; validation happens in
/// [`CustomMachineTypeBuilder::build`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomMachineTypeBuilder {
    family: CpuFamily,
    zone: Option<String>,
    core_count: u32,
    memory_mb: u64,
}

impl CustomMachineTypeBuilder {
    /// Creates a builder with no zone, zero cores and zero memory.
    #[must_use]
    pub const fn new(family: CpuFamily) -> Self {
        Self {
            family,
            zone: None,
            core_count: 0,
            memory_mb: 0,
        }
    }

    /// Sets the zone.
    #[must_use]
    pub fn zone(mut self, value: impl Into<String>) -> Self {
        self.zone = Some(value.into());
        self
    }

    /// Sets the core count; ignored for shared-core families.
    #[must_use]
    pub const fn core_count(mut self, value: u32) -> Self {
        self.core_count = value;
        self
    }

    /// Sets the memory in MB.
    #[must_use]
    pub const fn memory_mb(mut self, value: u64) -> Self {
        self.memory_mb = value;
        self
    }

    /// Sets the memory in GB.
    #[must_use]
    pub const fn memory_gb(mut self, value: u64) -> Self {
        self.memory_mb = gb_to_mb(value);
        self
    }

    /// Validates and builds the machine type.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`CustomMachineType::new`].
    pub fn build(self) -> Result<CustomMachineType, MachineTypeError> {
        CustomMachineType::new(self.zone, self.family, self.memory_mb, self.core_count)
    }
}
