//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::machine_type::CpuFamily;

/// Defaults for the `kroy` CLI derived from environment variables and
/// configuration files.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "KROY")]
pub struct KroyConfig {
    /// Zone used by `kroy format` when `--zone` is omitted. Without one the
    /// short, zone-less identifier is printed.
    pub default_zone: Option<String>,
    /// CPU family used when `--family` is omitted. Defaults to `e2`.
    #[ortho_config(default = "e2".to_owned())]
    pub default_family: String,
    /// Tracing filter applied when `RUST_LOG` is unset. Defaults to `warn`.
    #[ortho_config(default = "warn".to_owned())]
    pub log_level: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn guidance(&self) -> String {
        format!(
            "set {} or add {} to kroy.toml",
            self.env_var, self.toml_key
        )
    }
}

const ZONE_FIELD: FieldMetadata =
    FieldMetadata::new("default zone", "KROY_DEFAULT_ZONE", "default_zone");
const FAMILY_FIELD: FieldMetadata =
    FieldMetadata::new("default CPU family", "KROY_DEFAULT_FAMILY", "default_family");
const LOG_LEVEL_FIELD: FieldMetadata =
    FieldMetadata::new("log level", "KROY_LOG_LEVEL", "log_level");

impl KroyConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: {}",
                metadata.description,
                metadata.guidance()
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("kroy")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves the configured default family.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when the value names no known
    /// family.
    pub fn family(&self) -> Result<CpuFamily, ConfigError> {
        self.default_family.parse().map_err(|_| {
            ConfigError::InvalidField(format!(
                "unknown {} '{}': {}",
                FAMILY_FIELD.description,
                self.default_family.trim(),
                FAMILY_FIELD.guidance()
            ))
        })
    }

    /// Configured default zone, trimmed.
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.default_zone.as_deref().map(str::trim)
    }

    /// Performs semantic validation. Error messages include guidance on how
    /// to fix the value via environment variables or the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is blank
    /// and [`ConfigError::InvalidField`] when a value is not usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(&self.default_family, &FAMILY_FIELD)?;
        self.family()?;
        Self::require_field(&self.log_level, &LOG_LEVEL_FIELD)?;

        if let Some(zone) = &self.default_zone {
            Self::require_field(zone, &ZONE_FIELD)?;
            if !is_zone_name(zone.trim()) {
                return Err(ConfigError::InvalidField(format!(
                    "invalid {} '{}': expected lowercase letters, digits and dashes; {}",
                    ZONE_FIELD.description,
                    zone.trim(),
                    ZONE_FIELD.guidance()
                )));
            }
        }
        Ok(())
    }
}

fn is_zone_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-')
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is present but unusable.
    #[error("invalid configuration field: {0}")]
    InvalidField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
