//! Error types for custom machine type validation and parsing.

use std::fmt;

use thiserror::Error;

use super::family::CpuFamily;

/// Which ceiling a too-large memory request exceeded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryCeiling {
    /// The family does not allow extended memory; the value is MB per core.
    PerCore(u64),
    /// Extended memory is allowed but capped; the value is total MB.
    Absolute(u64),
}

impl fmt::Display for MemoryCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerCore(limit) => write!(f, "{limit} MB per core"),
            Self::Absolute(limit) => write!(f, "{limit} MB"),
        }
    }
}

/// Errors raised while building or parsing a custom machine type.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MachineTypeError {
    /// Raised when the core count is not in the family's allowed list.
    #[error(
        "invalid number of cores requested: {requested}; allowed number of cores for {family} is: {allowed:?}"
    )]
    InvalidCoreCount {
        /// Family being validated.
        family: CpuFamily,
        /// Core count supplied by the caller.
        requested: u32,
        /// Sorted list of permitted core counts.
        allowed: Vec<u32>,
    },
    /// Raised when memory is not a whole number of 256 MB blocks.
    #[error("requested memory must be a multiple of 256 MB, got {memory_mb} MB")]
    InvalidMemoryGranularity {
        /// Memory supplied by the caller.
        memory_mb: u64,
    },
    /// Raised when memory is below the family's per-core minimum.
    #[error(
        "requested memory is too low: minimal memory for {family} is {min_per_core_mb} MB per core"
    )]
    MemoryTooLow {
        /// Family being validated.
        family: CpuFamily,
        /// Memory supplied by the caller.
        memory_mb: u64,
        /// Per-core minimum for the family.
        min_per_core_mb: u64,
    },
    /// Raised when memory is above every ceiling the family allows.
    #[error("requested memory is too large: maximum memory allowed for {family} is {ceiling}")]
    MemoryTooHigh {
        /// Family being validated.
        family: CpuFamily,
        /// Memory supplied by the caller.
        memory_mb: u64,
        /// Ceiling that was exceeded.
        ceiling: MemoryCeiling,
    },
    /// Raised when an identifier or argument names an unrecognised family.
    #[error("unknown CPU family '{code}'")]
    UnknownCpuFamily {
        /// Family code as written by the caller.
        code: String,
    },
    /// Raised when an identifier does not match any accepted shape.
    #[error("malformed machine type '{identifier}': {reason}")]
    MalformedIdentifier {
        /// Identifier as supplied by the caller.
        identifier: String,
        /// What part of the identifier was wrong.
        reason: String,
    },
}

/// Fieldless classification of [`MachineTypeError`].
///
/// Message text is diagnostic only; match on the kind when behaviour depends
/// on why a request was rejected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// See [`MachineTypeError::InvalidCoreCount`].
    InvalidCoreCount,
    /// See [`MachineTypeError::InvalidMemoryGranularity`].
    InvalidMemoryGranularity,
    /// See [`MachineTypeError::MemoryTooLow`].
    MemoryTooLow,
    /// See [`MachineTypeError::MemoryTooHigh`].
    MemoryTooHigh,
    /// See [`MachineTypeError::UnknownCpuFamily`].
    UnknownCpuFamily,
    /// See [`MachineTypeError::MalformedIdentifier`].
    MalformedIdentifier,
}

impl MachineTypeError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCoreCount { .. } => ErrorKind::InvalidCoreCount,
            Self::InvalidMemoryGranularity { .. } => ErrorKind::InvalidMemoryGranularity,
            Self::MemoryTooLow { .. } => ErrorKind::MemoryTooLow,
            Self::MemoryTooHigh { .. } => ErrorKind::MemoryTooHigh,
            Self::UnknownCpuFamily { .. } => ErrorKind::UnknownCpuFamily,
            Self::MalformedIdentifier { .. } => ErrorKind::MalformedIdentifier,
        }
    }

    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.to_owned(),
            reason: reason.into(),
        }
    }
}
