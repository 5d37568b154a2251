//! Grammar for custom machine type identifiers.
//!
//! Accepted shapes:
//!
//! ```text
//! https://.../zones/<zone>/machineTypes/<name>
//! zones/<zone>/machineTypes/<name>
//! <name>
//!
//! <name> := custom-<cores>-<memory>[-ext]
//!         | <code>-custom-<cores>-<memory>[-ext]     code in {n2, n2d, e2}
//!         | e2-custom-<size>-<memory>               size in {micro, small, medium}
//! ```
//!
//! The `-ext` suffix is stripped and otherwise ignored: whether a machine type
//! uses extended memory follows from its cores and memory alone.

use std::str::FromStr;

use super::error::MachineTypeError;
use super::family::{CpuFamily, SHARED_CORE_COUNT};

const ZONES_MARKER: &str = "zones/";
const MACHINE_TYPES_SEGMENT: &str = "machineTypes";
const EXTRA_MEMORY_SUFFIX: &str = "-ext";
const N1_PREFIX: &str = "custom-";
const CUSTOM_TOKEN: &str = "custom";

/// Fields recovered from an identifier before limit validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ParsedIdentifier<'a> {
    pub(crate) zone: Option<&'a str>,
    pub(crate) family: CpuFamily,
    pub(crate) core_count: u32,
    pub(crate) memory_mb: u64,
}

/// Splits an identifier into its zone and trailing machine type name.
fn split_location(identifier: &str) -> Result<(Option<&str>, &str), MachineTypeError> {
    let Some((_, path)) = identifier.split_once(ZONES_MARKER) else {
        if identifier.contains('/') {
            return Err(MachineTypeError::malformed(
                identifier,
                "expected zones/<zone>/machineTypes/<name> or a bare name",
            ));
        }
        return Ok((None, identifier));
    };

    let mut segments = path.split('/');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(zone), Some(MACHINE_TYPES_SEGMENT), Some(name), None)
            if !zone.trim().is_empty() =>
        {
            Ok((Some(zone), name))
        }
        _ => Err(MachineTypeError::malformed(
            identifier,
            "expected zones/<zone>/machineTypes/<name>",
        )),
    }
}

fn parse_number<T: FromStr>(
    identifier: &str,
    token: &str,
    what: &str,
) -> Result<T, MachineTypeError> {
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(MachineTypeError::malformed(
            identifier,
            format!("{what} '{token}' is not a number"),
        ));
    }
    token.parse().map_err(|_| {
        MachineTypeError::malformed(identifier, format!("{what} '{token}' is out of range"))
    })
}

fn parse_n1<'a>(
    identifier: &str,
    zone: Option<&'a str>,
    body: &str,
) -> Result<ParsedIdentifier<'a>, MachineTypeError> {
    let Some((cores, memory)) = body
        .strip_prefix(N1_PREFIX)
        .and_then(|rest| rest.split_once('-'))
    else {
        return Err(MachineTypeError::malformed(
            identifier,
            "expected custom-<cores>-<memory>",
        ));
    };

    Ok(ParsedIdentifier {
        zone,
        family: CpuFamily::N1,
        core_count: parse_number(identifier, cores, "core count")?,
        memory_mb: parse_number(identifier, memory, "memory")?,
    })
}

fn parse_prefixed<'a>(
    identifier: &str,
    zone: Option<&'a str>,
    body: &str,
) -> Result<ParsedIdentifier<'a>, MachineTypeError> {
    let tokens: Vec<&str> = body.split('-').collect();
    let [code, CUSTOM_TOKEN, size, memory] = tokens.as_slice() else {
        return Err(MachineTypeError::malformed(
            identifier,
            "expected <family>-custom-<cores>-<memory>",
        ));
    };

    let base_family =
        CpuFamily::from_code(code).ok_or_else(|| MachineTypeError::UnknownCpuFamily {
            code: (*code).to_owned(),
        })?;

    let shared = if base_family == CpuFamily::E2 {
        CpuFamily::shared_from_size(size)
    } else {
        None
    };
    let (family, core_count) = match shared {
        Some(shared_family) => (shared_family, SHARED_CORE_COUNT),
        None => (base_family, parse_number(identifier, size, "core count")?),
    };

    Ok(ParsedIdentifier {
        zone,
        family,
        core_count,
        memory_mb: parse_number(identifier, memory, "memory")?,
    })
}

/// Recovers zone, family, core count and memory from an identifier.
///
/// Only the structure is checked here; family limits are applied by the
/// caller.
pub(crate) fn parse(identifier: &str) -> Result<ParsedIdentifier<'_>, MachineTypeError> {
    let (zone, name) = split_location(identifier)?;
    let body = name.strip_suffix(EXTRA_MEMORY_SUFFIX).unwrap_or(name);

    if body.starts_with(CUSTOM_TOKEN) {
        parse_n1(identifier, zone, body)
    } else {
        parse_prefixed(identifier, zone, body)
    }
}

fn is_name_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-')
}

/// Returns `true` for strings of the exact form
/// `zones/<zone>/machineTypes/<name>` with lowercase alphanumeric tokens.
#[must_use]
pub fn is_zonal_machine_type(value: &str) -> bool {
    let Some(path) = value.strip_prefix(ZONES_MARKER) else {
        return false;
    };
    let mut segments = path.split('/');
    matches!(
        (segments.next(), segments.next(), segments.next(), segments.next()),
        (Some(zone), Some(MACHINE_TYPES_SEGMENT), Some(name), None)
            if is_name_token(zone) && is_name_token(name)
    )
}

/// Qualifies a machine type with a zone unless it already carries one.
///
/// `n1-standard-1` in `europe-west3-c` becomes
/// `zones/europe-west3-c/machineTypes/n1-standard-1`; an already zonal value
/// is returned unchanged.
#[must_use]
pub fn qualify_machine_type(zone: &str, machine_type: &str) -> String {
    if is_zonal_machine_type(machine_type) {
        machine_type.to_owned()
    } else {
        format!("{ZONES_MARKER}{zone}/{MACHINE_TYPES_SEGMENT}/{machine_type}")
    }
}
