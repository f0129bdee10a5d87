//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config directory)
//! 3. `DUPESCAN_*` environment variables (e.g. `DUPESCAN_ALGORITHM=sha256`)
//! 4. Command-line flags
//!
//! The result is turned into an explicit [`ClassifierConfig`] before a scan
//! starts; nothing downstream reads configuration on its own.
//!
//! ```toml
//! algorithm = "sha1"
//! window = "suffix"
//! window_size = 65536
//! report = "candidates"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{CopySet, HashingArgs, OutputFormat, WindowMode};
use crate::duplicates::{ClassifierConfig, ReportMode};
use crate::scanner::{HashAlgorithm, WindowPolicy, DEFAULT_WINDOW_SIZE};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has a value of the wrong type.
    #[error("Invalid configuration: {0}")]
    Load(#[from] figment::Error),

    /// A value parsed but is out of range.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Offending setting
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Which part of each file is hashed.
    pub window: WindowMode,
    /// Window length in bytes for prefix and suffix windows.
    pub window_size: u64,
    /// Window length in percent for the proportional window.
    pub window_percent: u8,
    /// Result list printed by `scan`.
    pub report: ReportMode,
    /// Output format.
    pub output: OutputFormat,
    /// Files copied by `--copy-to`.
    pub copy_set: CopySet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            window: WindowMode::default(),
            window_size: DEFAULT_WINDOW_SIZE,
            window_percent: 10,
            report: ReportMode::default(),
            output: OutputFormat::default(),
            copy_set: CopySet::default(),
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// With `explicit` set, that file must exist. Otherwise the default
    /// platform path is used when present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing (explicit path only),
    /// malformed, or contains values of the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::default_path().filter(|p| p.is_file()),
        };

        match path {
            Some(ref p) => log::debug!("Loading configuration from {}", p.display()),
            None => log::debug!("No configuration file, using defaults and environment"),
        }

        let config: Self = Self::figment(path.as_deref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file plus the environment.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Layered provider chain without the CLI layer.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupescan", "dupescan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply hashing flags given on the command line.
    #[must_use]
    pub fn with_hashing_overrides(mut self, args: &HashingArgs) -> Self {
        if let Some(algorithm) = args.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(window) = args.window {
            self.window = window;
        }
        if let Some(size) = args.window_size {
            self.window_size = size;
        }
        if let Some(percent) = args.window_percent {
            self.window_percent = percent;
        }
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero window size or a
    /// percentage outside 1..=100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window_size",
                message: "must be greater than zero".to_string(),
            });
        }
        if !(1..=100).contains(&self.window_percent) {
            return Err(ConfigError::InvalidValue {
                field: "window_percent",
                message: format!("{} is not between 1 and 100", self.window_percent),
            });
        }
        Ok(())
    }

    /// Window policy described by this configuration.
    #[must_use]
    pub fn window_policy(&self) -> WindowPolicy {
        match self.window {
            WindowMode::Prefix => WindowPolicy::Prefix(self.window_size),
            WindowMode::Suffix => WindowPolicy::Suffix(self.window_size),
            WindowMode::Proportional => WindowPolicy::Proportional(self.window_percent),
            WindowMode::WholeFile => WindowPolicy::WholeFile,
        }
    }

    /// Hashing settings for the classifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the values are out of range.
    pub fn classifier_config(&self) -> Result<ClassifierConfig, ConfigError> {
        self.validate()?;
        Ok(ClassifierConfig::new(self.algorithm, self.window_policy()))
    }
}
