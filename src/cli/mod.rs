//! Command-line interface definitions for the `kroy` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page. It
//! must only depend on `clap`.

use clap::{Args, Parser};

/// Top-level CLI for the `kroy` binary.
#[derive(Debug, Parser)]
#[command(
    name = "kroy",
    about = "Validate, format and parse custom machine type identifiers",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Build a custom machine type and print its identifier.
    #[command(name = "format", about = "Build a custom machine type and print its identifier")]
    Format(FormatCommand),
    /// Parse an identifier and print its fields.
    #[command(name = "parse", about = "Parse an identifier and print its fields")]
    Parse(ParseCommand),
    /// Print the per-family limits.
    #[command(name = "limits", about = "Print the core and memory limits of each CPU family")]
    Limits(LimitsCommand),
}

/// Memory size for `kroy format`, in exactly one unit.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub(crate) struct MemoryArgs {
    /// Memory in megabytes; must be a multiple of 256.
    #[arg(long, value_name = "MB")]
    pub(crate) memory_mb: Option<u64>,
    /// Memory in gigabytes; converted to megabytes (1 GB = 1024 MB).
    #[arg(long, value_name = "GB")]
    pub(crate) memory_gb: Option<u64>,
}

/// Arguments for the `kroy format` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct FormatCommand {
    /// CPU family, for example `n2`, `e2` or `e2-small`. Falls back to the
    /// configured default family.
    #[arg(long, value_name = "FAMILY")]
    pub(crate) family: Option<String>,
    /// Number of virtual cores. Ignored for shared-core families, which
    /// always use two.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub(crate) cores: u32,
    #[command(flatten)]
    pub(crate) memory: MemoryArgs,
    /// Zone to embed in the identifier. Falls back to the configured default
    /// zone; without either the short form is printed.
    #[arg(long, value_name = "ZONE")]
    pub(crate) zone: Option<String>,
    /// Print only the trailing machine type name.
    #[arg(long)]
    pub(crate) short: bool,
}

/// Arguments for the `kroy parse` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ParseCommand {
    /// Identifier to parse: a full URL, a `zones/<zone>/machineTypes/<name>`
    /// path or a bare name.
    #[arg(required = true, value_name = "IDENTIFIER")]
    pub(crate) identifier: String,
    /// Print JSON instead of `key=value` lines.
    #[arg(long)]
    pub(crate) json: bool,
}

/// Arguments for the `kroy limits` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct LimitsCommand {
    /// Restrict the output to one family.
    #[arg(long, value_name = "FAMILY")]
    pub(crate) family: Option<String>,
    /// Print JSON instead of one line per family.
    #[arg(long)]
    pub(crate) json: bool,
}
