//! CPU families and their custom machine type limits.
//!
//! Limits follow the provider's general-purpose machine documentation:
//! <https://cloud.google.com/compute/docs/general-purpose-machines>

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::MachineTypeError;
use crate::memory::gb_to_mb;

/// Core count used by every shared-core family.
pub const SHARED_CORE_COUNT: u32 = 2;

/// CPU family of a custom machine type.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CpuFamily {
    /// First generation general-purpose machines.
    N1,
    /// Second generation Intel machines.
    N2,
    /// Second generation AMD machines.
    N2d,
    /// Cost-optimised machines.
    E2,
    /// Shared-core E2 with a quarter of a physical core.
    E2Micro,
    /// Shared-core E2 with half of a physical core.
    E2Small,
    /// Shared-core E2 with a full physical core.
    E2Medium,
}

impl CpuFamily {
    /// Every family, in the order used by `kroy limits`.
    pub const ALL: [Self; 7] = [
        Self::N1,
        Self::N2,
        Self::N2d,
        Self::E2,
        Self::E2Micro,
        Self::E2Small,
        Self::E2Medium,
    ];

    /// Canonical name used in messages, for example `E2_SMALL`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::N1 => "N1",
            Self::N2 => "N2",
            Self::N2d => "N2D",
            Self::E2 => "E2",
            Self::E2Micro => "E2_MICRO",
            Self::E2Small => "E2_SMALL",
            Self::E2Medium => "E2_MEDIUM",
        }
    }

    /// Leading token of the machine type name, for example `n2d-custom`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::N1 => "custom",
            Self::N2 => "n2-custom",
            Self::N2d => "n2d-custom",
            Self::E2 => "e2-custom",
            Self::E2Micro => "e2-custom-micro",
            Self::E2Small => "e2-custom-small",
            Self::E2Medium => "e2-custom-medium",
        }
    }

    /// Returns `true` for families pinned to [`SHARED_CORE_COUNT`] cores.
    #[must_use]
    pub const fn is_shared_core(self) -> bool {
        matches!(self, Self::E2Micro | Self::E2Small | Self::E2Medium)
    }

    /// Static limits for this family.
    #[must_use]
    pub const fn limits(self) -> &'static FamilyLimits {
        match self {
            Self::N1 => &N1_LIMITS,
            Self::N2 => &N2_LIMITS,
            Self::N2d => &N2D_LIMITS,
            Self::E2 => &E2_LIMITS,
            Self::E2Micro => &E2_MICRO_LIMITS,
            Self::E2Small => &E2_SMALL_LIMITS,
            Self::E2Medium => &E2_MEDIUM_LIMITS,
        }
    }

    /// Maps the family code of a `<code>-custom-...` name to a family.
    ///
    /// Shared-core variants are selected later from the size token, so `e2`
    /// always maps to [`CpuFamily::E2`] here.
    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            "n2" => Some(Self::N2),
            "n2d" => Some(Self::N2d),
            "e2" => Some(Self::E2),
            _ => None,
        }
    }

    /// Maps the size token of an `e2-custom-<size>-...` name to a shared-core
    /// family.
    pub(crate) fn shared_from_size(size: &str) -> Option<Self> {
        match size {
            "micro" => Some(Self::E2Micro),
            "small" => Some(Self::E2Small),
            "medium" => Some(Self::E2Medium),
            _ => None,
        }
    }
}

impl fmt::Display for CpuFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CpuFamily {
    type Err = MachineTypeError;

    /// Accepts the canonical name (`E2_SMALL`) or the dashed lowercase form
    /// (`e2-small`), ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|family| family.name() == normalised)
            .ok_or_else(|| MachineTypeError::UnknownCpuFamily {
                code: value.trim().to_owned(),
            })
    }
}

/// Inclusive arithmetic progression of permitted core counts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct CoreRange {
    first: u32,
    last: u32,
    step: u32,
}

impl CoreRange {
    const fn single(count: u32) -> Self {
        Self {
            first: count,
            last: count,
            step: 1,
        }
    }

    const fn stepped(first: u32, last: u32, step: u32) -> Self {
        Self { first, last, step }
    }

    const fn contains(&self, count: u32) -> bool {
        count >= self.first
            && count <= self.last
            && (count - self.first).is_multiple_of(self.step)
    }

    fn iter(&self) -> impl Iterator<Item = u32> {
        let step = usize::try_from(self.step).unwrap_or(1);
        (self.first..=self.last).step_by(step)
    }
}

/// Core and memory limits of one [`CpuFamily`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FamilyLimits {
    core_ranges: &'static [CoreRange],
    /// Lowest memory allowed per core, in MB.
    pub min_memory_per_core_mb: u64,
    /// Highest memory allowed per core before extended memory applies, in MB.
    pub max_memory_per_core_mb: u64,
    /// Whether memory may exceed the per-core maximum up to the cap.
    pub allows_extra_memory: bool,
    /// Absolute memory ceiling with extended memory, in MB (0 when unused).
    pub extra_memory_cap_mb: u64,
}

impl FamilyLimits {
    /// Returns `false` when the family has no explicit core count list.
    #[must_use]
    pub const fn constrains_core_count(&self) -> bool {
        !self.core_ranges.is_empty()
    }

    /// Returns `true` when `count` is an acceptable core count.
    #[must_use]
    pub fn permits_core_count(&self, count: u32) -> bool {
        !self.constrains_core_count() || self.core_ranges.iter().any(|r| r.contains(count))
    }

    /// Sorted list of permitted core counts; empty when unconstrained.
    #[must_use]
    pub fn allowed_core_counts(&self) -> Vec<u32> {
        self.core_ranges
            .iter()
            .flat_map(CoreRange::iter)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest memory size, in MB, accepted for `core_count` cores.
    #[must_use]
    pub fn min_memory_mb(&self, core_count: u32) -> u64 {
        u64::from(core_count).saturating_mul(self.min_memory_per_core_mb)
    }

    /// Largest memory size, in MB, before extended memory applies.
    #[must_use]
    pub fn max_standard_memory_mb(&self, core_count: u32) -> u64 {
        u64::from(core_count).saturating_mul(self.max_memory_per_core_mb)
    }
}

const EVEN_UP_TO_32: CoreRange = CoreRange::stepped(2, 32, 2);

static E2_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[EVEN_UP_TO_32],
    min_memory_per_core_mb: 512,
    max_memory_per_core_mb: 8192,
    allows_extra_memory: false,
    extra_memory_cap_mb: 0,
};

static E2_MICRO_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[],
    min_memory_per_core_mb: 1024,
    max_memory_per_core_mb: 2048,
    allows_extra_memory: false,
    extra_memory_cap_mb: 0,
};

static E2_SMALL_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[],
    min_memory_per_core_mb: 2048,
    max_memory_per_core_mb: 4096,
    allows_extra_memory: false,
    extra_memory_cap_mb: 0,
};

static E2_MEDIUM_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[],
    min_memory_per_core_mb: 4096,
    max_memory_per_core_mb: 8192,
    allows_extra_memory: false,
    extra_memory_cap_mb: 0,
};

static N2_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[EVEN_UP_TO_32, CoreRange::stepped(36, 128, 4)],
    min_memory_per_core_mb: 512,
    max_memory_per_core_mb: 8192,
    allows_extra_memory: true,
    extra_memory_cap_mb: gb_to_mb(624),
};

static N2D_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[
        CoreRange::single(2),
        CoreRange::single(4),
        CoreRange::single(8),
        CoreRange::stepped(16, 96, 16),
    ],
    min_memory_per_core_mb: 512,
    max_memory_per_core_mb: 8192,
    allows_extra_memory: true,
    extra_memory_cap_mb: gb_to_mb(768),
};

static N1_LIMITS: FamilyLimits = FamilyLimits {
    core_ranges: &[CoreRange::single(1), CoreRange::stepped(2, 96, 2)],
    min_memory_per_core_mb: 922,
    max_memory_per_core_mb: 6656,
    allows_extra_memory: true,
    extra_memory_cap_mb: gb_to_mb(624),
};
