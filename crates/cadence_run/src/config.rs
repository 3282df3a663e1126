//! Layered configuration loading.
//!
//! Sources, later ones overriding earlier:
//! - Bundled defaults (include_str! from cadence.toml)
//! - `~/.config/cadence/cadence.toml`
//! - `./cadence.toml`
//! - An explicit file, when given
//! - `CADENCE_<SECTION>__<KEY>` environment variables

use cadence_core::{EngineConfig, ProviderConfig};
use cadence_error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../cadence.toml");

/// Source name reported for errors in the merged configuration.
const LAYERED: &str = "layered configuration";

/// Where a run reads its inputs and writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct PathsConfig {
    /// Root under which each run gets `{run_id}/`
    output_dir: PathBuf,
    /// Root that narration audio references are resolved against
    audio_dir: PathBuf,
    /// Directory of per-scene footprint snapshots
    footprint_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output/runs"),
            audio_dir: PathBuf::from("output/audio"),
            footprint_dir: PathBuf::from("output/footprints"),
        }
    }
}

/// Top-level Cadence configuration.
///
/// # Example
///
/// ```no_run
/// use cadence_run::CadenceConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CadenceConfig::load(None)?;
/// println!("clamp tolerance: {} ms", config.engine().clamp_tolerance_ms());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct CadenceConfig {
    /// Engine tolerances and policies
    engine: EngineConfig,
    /// External provider settings, part of the run identity
    provider: ProviderConfig,
    /// Input and output locations
    paths: PathsConfig,
}

impl CadenceConfig {
    /// Load configuration from a single file, without other layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(path.as_ref().display().to_string(), format!("Failed to read: {}", e))
            })?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(path.as_ref().display().to_string(), format!("Failed to parse: {}", e))
            })?;

        config.engine.validate()?;
        Ok(config)
    }

    /// Load configuration with every layer applied.
    ///
    /// User config files are optional and skipped when absent; `explicit`, when
    /// given, must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed or the merged engine
    /// settings are inconsistent.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cadence/cadence.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder.add_source(File::with_name("cadence").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(LAYERED, format!("Failed to build: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(LAYERED, format!("Failed to parse: {}", e)))?;

        config.engine.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(LAYERED, format!("Failed to render as TOML: {}", e)))
    }
}
