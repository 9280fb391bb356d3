//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/q-audit/config.toml

pub mod defaults;

use crate::aggregate::UniformitySettings;
use crate::entropy::TestSettings;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default values for drawing and reporting
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Bitstring-to-number mapping
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Randomness test battery
    #[serde(default)]
    pub tests: TestsConfig,

    /// Repeated-trial uniformity check
    #[serde(default)]
    pub uniformity: UniformityConfig,

    /// Run log
    #[serde(default)]
    pub log: LogConfig,
}

/// Default values for drawing and reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default entropy source
    #[serde(default = "default_source")]
    pub source: String,

    /// Samples drawn per source
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// RNG seed; 0 draws from OS entropy
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Bitstring-to-number mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default = "default_bit_width")]
    pub bit_width: u32,

    #[serde(default = "default_range_min")]
    pub min: i64,

    #[serde(default = "default_range_max")]
    pub max: i64,
}

/// Randomness test battery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestsConfig {
    #[serde(default = "default_frequency_significance")]
    pub frequency_significance: f64,

    #[serde(default = "default_pattern_significance")]
    pub pattern_significance: f64,

    #[serde(default = "default_pattern_min_length")]
    pub pattern_min_length: usize,

    #[serde(default = "default_pattern_max_length")]
    pub pattern_max_length: usize,
}

/// Repeated-trial uniformity check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformityConfig {
    /// Number of independent trials
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Shots per trial
    #[serde(default = "default_shots")]
    pub shots: usize,

    /// Maximum relative error per mapped value
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Trials run at once
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Run log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Append every uniformity trial to the run log
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,

    /// File name under the data directory, or an absolute path
    #[serde(default = "default_log_file")]
    pub file: String,
}

// Default value functions for serde
fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
fn default_samples() -> usize {
    DEFAULT_SAMPLES
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_bit_width() -> u32 {
    DEFAULT_BIT_WIDTH
}
fn default_range_min() -> i64 {
    DEFAULT_RANGE_MIN
}
fn default_range_max() -> i64 {
    DEFAULT_RANGE_MAX
}
fn default_frequency_significance() -> f64 {
    DEFAULT_FREQUENCY_SIGNIFICANCE
}
fn default_pattern_significance() -> f64 {
    DEFAULT_PATTERN_SIGNIFICANCE
}
fn default_pattern_min_length() -> usize {
    DEFAULT_PATTERN_MIN_LENGTH
}
fn default_pattern_max_length() -> usize {
    DEFAULT_PATTERN_MAX_LENGTH
}
fn default_trials() -> usize {
    DEFAULT_TRIALS
}
fn default_shots() -> usize {
    DEFAULT_SHOTS
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_workers() -> usize {
    DEFAULT_WORKERS
}
fn default_log_enabled() -> bool {
    DEFAULT_LOG_ENABLED
}
fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            samples: default_samples(),
            format: default_format(),
            seed: default_seed(),
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            bit_width: default_bit_width(),
            min: default_range_min(),
            max: default_range_max(),
        }
    }
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            frequency_significance: default_frequency_significance(),
            pattern_significance: default_pattern_significance(),
            pattern_min_length: default_pattern_min_length(),
            pattern_max_length: default_pattern_max_length(),
        }
    }
}

impl Default for UniformityConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            shots: default_shots(),
            tolerance: default_tolerance(),
            workers: default_workers(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            file: default_log_file(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "source"] => Some(self.defaults.source.clone()),
            ["defaults", "samples"] => Some(self.defaults.samples.to_string()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),
            ["defaults", "seed"] => Some(self.defaults.seed.to_string()),

            ["mapping", "bit_width"] => Some(self.mapping.bit_width.to_string()),
            ["mapping", "min"] => Some(self.mapping.min.to_string()),
            ["mapping", "max"] => Some(self.mapping.max.to_string()),

            ["tests", "frequency_significance"] => {
                Some(self.tests.frequency_significance.to_string())
            }
            ["tests", "pattern_significance"] => Some(self.tests.pattern_significance.to_string()),
            ["tests", "pattern_min_length"] => Some(self.tests.pattern_min_length.to_string()),
            ["tests", "pattern_max_length"] => Some(self.tests.pattern_max_length.to_string()),

            ["uniformity", "trials"] => Some(self.uniformity.trials.to_string()),
            ["uniformity", "shots"] => Some(self.uniformity.shots.to_string()),
            ["uniformity", "tolerance"] => Some(self.uniformity.tolerance.to_string()),
            ["uniformity", "workers"] => Some(self.uniformity.workers.to_string()),

            ["log", "enabled"] => Some(self.log.enabled.to_string()),
            ["log", "file"] => Some(self.log.file.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "source"] => self.defaults.source = value.to_string(),
            ["defaults", "samples"] => self.defaults.samples = parse_value(key, value)?,
            ["defaults", "format"] => self.defaults.format = value.to_string(),
            ["defaults", "seed"] => self.defaults.seed = parse_value(key, value)?,

            ["mapping", "bit_width"] => self.mapping.bit_width = parse_value(key, value)?,
            ["mapping", "min"] => self.mapping.min = parse_value(key, value)?,
            ["mapping", "max"] => self.mapping.max = parse_value(key, value)?,

            ["tests", "frequency_significance"] => {
                self.tests.frequency_significance = parse_value(key, value)?
            }
            ["tests", "pattern_significance"] => {
                self.tests.pattern_significance = parse_value(key, value)?
            }
            ["tests", "pattern_min_length"] => {
                self.tests.pattern_min_length = parse_value(key, value)?
            }
            ["tests", "pattern_max_length"] => {
                self.tests.pattern_max_length = parse_value(key, value)?
            }

            ["uniformity", "trials"] => self.uniformity.trials = parse_value(key, value)?,
            ["uniformity", "shots"] => self.uniformity.shots = parse_value(key, value)?,
            ["uniformity", "tolerance"] => self.uniformity.tolerance = parse_value(key, value)?,
            ["uniformity", "workers"] => self.uniformity.workers = parse_value(key, value)?,

            ["log", "enabled"] => self.log.enabled = parse_value(key, value)?,
            ["log", "file"] => self.log.file = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.source",
            "defaults.samples",
            "defaults.format",
            "defaults.seed",
            "mapping.bit_width",
            "mapping.min",
            "mapping.max",
            "tests.frequency_significance",
            "tests.pattern_significance",
            "tests.pattern_min_length",
            "tests.pattern_max_length",
            "uniformity.trials",
            "uniformity.shots",
            "uniformity.tolerance",
            "uniformity.workers",
            "log.enabled",
            "log.file",
        ]
    }

    /// Configured seed, or None to draw from OS entropy
    pub fn seed(&self) -> Option<u64> {
        (self.defaults.seed != 0).then_some(self.defaults.seed)
    }

    /// Test battery settings from the `[tests]` section
    pub fn test_settings(&self) -> TestSettings {
        TestSettings {
            frequency_significance: self.tests.frequency_significance,
            pattern_significance: self.tests.pattern_significance,
            pattern_min_length: self.tests.pattern_min_length,
            pattern_max_length: self.tests.pattern_max_length,
        }
    }

    /// Uniformity settings from the `[mapping]` and `[uniformity]` sections
    pub fn uniformity_settings(&self) -> UniformitySettings {
        UniformitySettings {
            bit_width: self.mapping.bit_width,
            min: self.mapping.min,
            max: self.mapping.max,
            trials: self.uniformity.trials,
            shots: self.uniformity.shots,
            tolerance: self.uniformity.tolerance,
            workers: self.uniformity.workers,
        }
    }

    /// Resolve the run log path
    ///
    /// Absolute paths are used as is; bare names land in the data directory.
    pub fn log_path(&self) -> Result<PathBuf> {
        let file = PathBuf::from(&self.log.file);
        if file.is_absolute() {
            return Ok(file);
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME).join(file))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.defaults.source, "superposition");
        assert_eq!(config.defaults.samples, 1024);
        assert_eq!(config.mapping.bit_width, 4);
        assert_eq!(config.mapping.min, 10);
        assert_eq!(config.mapping.max, 20);
        assert_eq!(config.uniformity.trials, 50);
        assert_eq!(config.uniformity.tolerance, 0.4);
        assert!(!config.log.enabled);
    }

    #[test]
    fn test_settings_match_library_defaults() {
        let config = Config::default();
        assert_eq!(config.test_settings(), TestSettings::default());
        assert_eq!(config.uniformity_settings(), UniformitySettings::default());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("defaults.source"), Some("superposition".to_string()));

        config.set("defaults.source", "pseudo").unwrap();
        assert_eq!(config.get("defaults.source"), Some("pseudo".to_string()));

        config.set("mapping.min", "-5").unwrap();
        assert_eq!(config.mapping.min, -5);

        config.set("uniformity.tolerance", "0.25").unwrap();
        assert_eq!(config.get("uniformity.tolerance"), Some("0.25".to_string()));
        assert_eq!(config.uniformity_settings().tolerance, 0.25);
    }

    #[test]
    fn test_every_key_is_gettable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("mapping.bit_width", "four").is_err());
        assert!(config.set("log.enabled", "maybe").is_err());
    }

    #[test]
    fn test_seed() {
        let mut config = Config::default();
        assert_eq!(config.seed(), None);
        config.set("defaults.seed", "42").unwrap();
        assert_eq!(config.seed(), Some(42));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("q-audit").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.defaults.source = "pseudo".to_string();
        config.uniformity.trials = 10;
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.defaults.source, "pseudo");
        assert_eq!(loaded.uniformity.trials, 10);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let config = Config::load_from(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(config.defaults.format, "text");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[mapping]\nmax = 99\n").unwrap();
        assert_eq!(loaded.mapping.max, 99);
        assert_eq!(loaded.mapping.min, 10);
        assert_eq!(loaded.uniformity.shots, 1024);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        // Check that key sections exist
        assert!(toml.contains("[defaults]"));
        assert!(toml.contains("[mapping]"));
        assert!(toml.contains("[tests]"));
        assert!(toml.contains("[uniformity]"));
        assert!(toml.contains("[log]"));
    }

    #[test]
    fn test_log_path() {
        let mut config = Config::default();
        config.log.file = "/tmp/q-audit-runs.jsonl".to_string();
        assert_eq!(
            config.log_path().unwrap(),
            PathBuf::from("/tmp/q-audit-runs.jsonl")
        );
    }
}
