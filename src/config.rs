use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::features::SchemaPolicy;
use crate::error::{Error, Result};
use crate::model::ArtifactPaths;

pub const DEFAULT_CONFIG_FILE: &str = "smart_water.toml";
pub const ENV_PREFIX: &str = "SMART_WATER_";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub model: String,
    pub scaler: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            model: "pune_water_zone_model.bin".into(),
            scaler: "pune_scaler.bin".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    pub log_path: PathBuf,
    pub chart_path: PathBuf,
    pub dashboard_chart_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("live_predictions.csv"),
            chart_path: PathBuf::from("live_predictions.png"),
            dashboard_chart_path: PathBuf::from("dashboard_simulation.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingConfig {
    pub dashboard_iterations: usize,
    pub dashboard_interval_secs: f64,
    pub visualize_duration_secs: f64,
    pub visualize_interval_secs: f64,
    pub monitor_interval_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dashboard_iterations: 15,
            dashboard_interval_secs: 1.0,
            visualize_duration_secs: 10.0,
            visualize_interval_secs: 1.0,
            monitor_interval_secs: 5.0,
        }
    }
}

impl TimingConfig {
    pub fn dashboard_interval(&self) -> Result<Duration> {
        to_duration("timing.dashboard_interval_secs", self.dashboard_interval_secs)
    }

    pub fn visualize_duration(&self) -> Result<Duration> {
        to_duration("timing.visualize_duration_secs", self.visualize_duration_secs)
    }

    pub fn visualize_interval(&self) -> Result<Duration> {
        to_duration("timing.visualize_interval_secs", self.visualize_interval_secs)
    }

    pub fn monitor_interval(&self) -> Result<Duration> {
        to_duration("timing.monitor_interval_secs", self.monitor_interval_secs)
    }

    fn validate(&self) -> Result<()> {
        self.dashboard_interval()?;
        self.visualize_duration()?;
        self.visualize_interval()?;
        self.monitor_interval()?;
        Ok(())
    }
}

/// Rejects negative, non-finite and out-of-range second counts.
pub fn to_duration(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::invalid_input(field, format!("{secs} seconds: {e}")))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub schema_policy: SchemaPolicy,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Config {
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.artifacts.dir, &self.artifacts.model, &self.artifacts.scaler)
    }
}

/// Builds the layered configuration: defaults, then the TOML file, then
/// `SMART_WATER_` environment variables (`__` separates sections).
pub fn layered_figment(config_path: Option<&Path>) -> Figment {
    let file = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_path {
        if !path.exists() {
            return Err(Error::invalid_input(
                "config",
                format!("{} does not exist", path.display()),
            ));
        }
    }
    let config: Config = layered_figment(config_path).extract()?;
    config.timing.validate()?;
    Ok(config)
}
