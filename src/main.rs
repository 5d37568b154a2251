//! Binary entry point for the `kroy` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kroy::{
    ConfigError, CpuFamily, CustomMachineType, FamilyLimitsReport, KroyConfig, MachineTypeError,
    MachineTypeReport, gb_to_mb,
};

mod cli;

use cli::{Cli, FormatCommand, LimitsCommand, ParseCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    MachineType(#[from] MachineTypeError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match load_config().and_then(|config| dispatch(cli, &config)) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn load_config() -> Result<KroyConfig, CliError> {
    let config = KroyConfig::load_without_cli_args()?;
    config.validate()?;
    init_tracing(&config.log_level);
    Ok(config)
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn dispatch(cli: Cli, config: &KroyConfig) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli {
        Cli::Format(command) => format_command(&mut out, &command, config),
        Cli::Parse(command) => parse_command(&mut out, &command),
        Cli::Limits(command) => limits_command(&mut out, &command),
    }
}

fn resolve_family(value: Option<&str>, config: &KroyConfig) -> Result<CpuFamily, CliError> {
    match value {
        Some(name) => Ok(name.parse()?),
        None => Ok(config.family()?),
    }
}

fn format_command(
    mut out: impl Write,
    command: &FormatCommand,
    config: &KroyConfig,
) -> Result<(), CliError> {
    let family = resolve_family(command.family.as_deref(), config)?;
    let memory_mb = command
        .memory
        .memory_mb
        .or_else(|| command.memory.memory_gb.map(gb_to_mb))
        .unwrap_or_default();
    let zone = command
        .zone
        .as_deref()
        .or_else(|| config.zone())
        .map(str::to_owned);
    debug!(%family, cores = command.cores, memory_mb, ?zone, "formatting machine type");

    let machine_type = CustomMachineType::new(zone, family, memory_mb, command.cores)?;
    if command.short {
        writeln!(out, "{}", machine_type.short_type())?;
    } else {
        writeln!(out, "{machine_type}")?;
    }
    Ok(())
}

fn parse_command(mut out: impl Write, command: &ParseCommand) -> Result<(), CliError> {
    let machine_type = CustomMachineType::parse(command.identifier.trim())?;
    let report = MachineTypeReport::from(&machine_type);
    if command.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{}", report.to_key_values())?;
    }
    Ok(())
}

fn limits_command(mut out: impl Write, command: &LimitsCommand) -> Result<(), CliError> {
    let families = match command.family.as_deref() {
        Some(name) => vec![name.parse::<CpuFamily>()?],
        None => CpuFamily::ALL.to_vec(),
    };
    let reports: Vec<FamilyLimitsReport> =
        families.into_iter().map(FamilyLimitsReport::from).collect();

    if command.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        return Ok(());
    }
    for report in &reports {
        writeln!(out, "{}", report.to_line())?;
    }
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> KroyConfig {
        KroyConfig {
            default_zone: None,
            default_family: String::from("e2"),
            log_level: String::from("warn"),
        }
    }

    fn format_args(family: Option<&str>, cores: u32, memory_mb: u64) -> FormatCommand {
        FormatCommand {
            family: family.map(str::to_owned),
            cores,
            memory: cli::MemoryArgs {
                memory_mb: Some(memory_mb),
                memory_gb: None,
            },
            zone: None,
            short: false,
        }
    }

    fn render(result: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut buf = Vec::new();
        result(&mut buf).unwrap_or_else(|err| panic!("command failed: {err}"));
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn format_uses_configured_family_and_zone() {
        let cfg = KroyConfig {
            default_zone: Some(String::from("us-central1-b")),
            ..config()
        };
        let command = format_args(None, 4, 8192);
        let rendered = render(|buf| format_command(buf, &command, &cfg));
        assert_eq!(rendered, "zones/us-central1-b/machineTypes/e2-custom-4-8192\n");
    }

    #[test]
    fn format_prefers_explicit_zone_and_short_form() {
        let command = FormatCommand {
            zone: Some(String::from("europe-west1-d")),
            short: true,
            ..format_args(Some("n2"), 32, 262_400)
        };
        let rendered = render(|buf| format_command(buf, &command, &config()));
        assert_eq!(rendered, "n2-custom-32-262400-ext\n");
    }

    #[test]
    fn format_converts_gigabytes() {
        let command = FormatCommand {
            memory: cli::MemoryArgs {
                memory_mb: None,
                memory_gb: Some(4),
            },
            ..format_args(Some("e2-small"), 0, 0)
        };
        let rendered = render(|buf| format_command(buf, &command, &config()));
        assert_eq!(rendered, "e2-custom-small-4096\n");
    }

    #[test]
    fn format_surfaces_validation_errors() {
        let command = format_args(Some("e2"), 3, 8192);
        let err = format_command(Vec::new(), &command, &config()).expect_err("3 cores is invalid");
        assert!(
            matches!(err, CliError::MachineType(MachineTypeError::InvalidCoreCount { .. })),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn format_rejects_unknown_family() {
        let command = format_args(Some("x3"), 4, 8192);
        let err = format_command(Vec::new(), &command, &config()).expect_err("x3 is unknown");
        assert!(
            matches!(err, CliError::MachineType(MachineTypeError::UnknownCpuFamily { .. })),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn parse_prints_json_when_requested() {
        let command = ParseCommand {
            identifier: String::from("zones/us-central1-b/machineTypes/n2-custom-4-10240"),
            json: true,
        };
        let rendered = render(|buf| parse_command(buf, &command));
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["family"], "N2");
        assert_eq!(value["memory_mb"], 10240);
    }

    #[test]
    fn limits_filters_by_family() {
        let command = LimitsCommand {
            family: Some(String::from("e2")),
            json: false,
        };
        let rendered = render(|buf| limits_command(buf, &command));
        assert_eq!(rendered.lines().count(), 1);
        assert!(rendered.starts_with("E2 prefix=e2-custom "), "rendered: {rendered}");
    }

    #[test]
    fn write_error_writes_cli_error() {
        let mut buf = Vec::new();
        let err = CliError::Config(ConfigError::MissingField(String::from("log level")));
        write_error(&mut buf, &err);
        let rendered = String::from_utf8(buf).expect("utf8");
        assert!(
            rendered.contains("configuration error: missing configuration field: log level"),
            "rendered: {rendered}"
        );
    }
}
