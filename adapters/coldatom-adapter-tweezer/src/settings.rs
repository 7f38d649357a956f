//! Settings for the tweezer backend.
//!
//! Supports loading settings from:
//! 1. A YAML file (explicit path, or `~/.coldatom/tweezer.yaml`)
//! 2. Environment variables (with `COLDATOM_` prefix)
//!
//! Precedence (highest to lowest):
//! 1. Environment variables
//! 2. Settings file
//! 3. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use coldatom_hal::HalError;

use crate::topology::TweezerChain;

/// Tweezer backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweezerSettings {
    /// Number of tweezer sites.
    #[serde(default = "default_n_tweezers")]
    pub n_tweezers: i64,

    /// Maximum shots per run.
    #[serde(default = "default_max_shots")]
    pub max_shots: u32,

    /// Maximum experiments per run.
    #[serde(default = "default_max_experiments")]
    pub max_experiments: u32,
}

fn default_n_tweezers() -> i64 {
    TweezerChain::DEFAULT_TWEEZERS
}

fn default_max_shots() -> u32 {
    TweezerChain::DEFAULT_MAX_SHOTS
}

fn default_max_experiments() -> u32 {
    TweezerChain::DEFAULT_MAX_EXPERIMENTS
}

impl Default for TweezerSettings {
    fn default() -> Self {
        Self {
            n_tweezers: default_n_tweezers(),
            max_shots: default_max_shots(),
            max_experiments: default_max_experiments(),
        }
    }
}

impl TweezerSettings {
    /// Default settings file location, `~/.coldatom/tweezer.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".coldatom").join("tweezer.yaml"))
    }

    /// Read settings from a YAML file.
    ///
    /// Values are not validated here; [`TweezerSettings::load`] validates
    /// once environment overrides have been applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SettingsError::Io(format!("{}: {e}", path.as_ref().display())))?;

        serde_yaml_ng::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Load settings with the following precedence:
    /// 1. `path` if provided, else the default file if it exists, else defaults
    /// 2. Environment variable overrides
    ///
    /// The merged result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`TweezerSettings::load`], reading overrides from `lookup`.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("Loading tweezer settings from {}", path.display());
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };

        let settings = settings.merge_env_with(lookup);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `COLDATOM_*` overrides from the process environment.
    pub fn merge_env(self) -> Self {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `COLDATOM_*` overrides from `lookup`.
    ///
    /// Only variables that are set override the current values; values that
    /// fail to parse are logged and ignored.
    pub fn merge_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("COLDATOM_TWEEZERS") {
            match v.parse() {
                Ok(val) => self.n_tweezers = val,
                Err(_) => warn!("Ignoring unparsable COLDATOM_TWEEZERS={v}"),
            }
        }
        if let Some(v) = lookup("COLDATOM_MAX_SHOTS") {
            match v.parse() {
                Ok(val) => self.max_shots = val,
                Err(_) => warn!("Ignoring unparsable COLDATOM_MAX_SHOTS={v}"),
            }
        }
        if let Some(v) = lookup("COLDATOM_MAX_EXPERIMENTS") {
            match v.parse() {
                Ok(val) => self.max_experiments = val,
                Err(_) => warn!("Ignoring unparsable COLDATOM_MAX_EXPERIMENTS={v}"),
            }
        }
        self
    }

    /// Validate settings values.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let max_tweezers = i64::from(TweezerChain::MAX_TWEEZERS);
        if !(1..=max_tweezers).contains(&self.n_tweezers) {
            return Err(SettingsError::Validation(format!(
                "n_tweezers must be in 1..={max_tweezers}, got {}",
                self.n_tweezers
            )));
        }
        if self.max_shots == 0 {
            return Err(SettingsError::Validation(
                "max_shots must be greater than 0".to_string(),
            ));
        }
        if self.max_experiments == 0 {
            return Err(SettingsError::Validation(
                "max_experiments must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<SettingsError> for HalError {
    fn from(e: SettingsError) -> Self {
        HalError::Configuration(e.to_string())
    }
}
