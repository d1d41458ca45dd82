// src/config.rs

use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

/// Decimal places used when rounding for display.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DisplayConfig {
    pub pips_dp: u32,
    pub pl_dp: u32,
    pub percent_dp: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set
    pub log_level: String,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
    pub channel_capacity: usize,
    /// When false, reports leave out positions that are valid and not risky
    pub emit_valid: bool,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Optional `Settings.{toml,yaml,json}` layered under `APP_*` variables
    /// (`APP_DISPLAY__PL_DP=4`).
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder(File::with_name("Settings").required(false))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::builder(File::with_name(path))
    }

    fn builder<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("channel_capacity", 64)?
            .set_default("emit_valid", true)?
            .set_default("display.pips_dp", 1)?
            .set_default("display.pl_dp", 2)?
            .set_default("display.percent_dp", 2)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            channel_capacity: 64,
            emit_valid: true,
            display: DisplayConfig {
                pips_dp: 1,
                pl_dp: 2,
                percent_dp: 2,
            },
        }
    }
}
