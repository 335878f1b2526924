//! Configuration module for `CityAid`

use crate::core::models::ContributionKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the config directory inside config values.
const DIR_VARIABLE: &str = "$CITYAID";

/// File name of the tracker store inside `data_dir`.
const STORE_FILE_NAME: &str = "store.json";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path (empty disables file logging)
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the tracker store
    #[serde(default)]
    pub data_dir: String,
    /// Directory for exported reports
    #[serde(default)]
    pub reports_dir: String,
}

/// Challenge generation preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengesConfig {
    /// Contribution categories challenges are drawn from.
    ///
    /// `None` means the key is missing and is filled from defaults on load.
    /// An empty list means "all categories".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Challenge settings
    #[serde(default)]
    pub challenges: ChallengesConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override data directory
    pub data_dir: Option<String>,
    /// Override reports directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$CITYAID` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/cityaid`
    /// - macOS: `~/Library/Application Support/cityaid`
    /// - Windows: `%APPDATA%\cityaid`
    #[must_use]
    pub fn get_cityaid_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cityaid")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_cityaid_dir().join(CONFIG_FILE_NAME)
    }

    /// Path of the tracker store file derived from `paths.data_dir`
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.data_dir).join(STORE_FILE_NAME)
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and non-empty in `defaults` are filled,
    /// so upgrading adds new keys without touching user settings.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }

        if self.paths.data_dir.is_empty() && !defaults.paths.data_dir.is_empty() {
            self.paths.data_dir.clone_from(&defaults.paths.data_dir);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        if self.challenges.types.is_none() && defaults.challenges.types.is_some() {
            self.challenges.types.clone_from(&defaults.challenges.types);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; nothing is written to disk.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir.clone_from(data_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Expand `$CITYAID` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let cityaid_dir = Self::get_cityaid_dir();
            value.replace(DIR_VARIABLE, cityaid_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults (empty strings, `false`).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_dir = Self::expand_variables(&config.paths.data_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from the user config file, creating it from defaults on first run
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// Load configuration from `config_file`
    ///
    /// - Existing file: parsed, merged with defaults, re-saved if new keys were added
    /// - Missing file: defaults are written to it and returned
    /// - Unreadable or invalid file: defaults are returned and the file is left alone
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            if let Err(e) = defaults.save_to(config_file) {
                logger::warn!(
                    "Could not write default config to {}: {e}",
                    config_file.display()
                );
            }
            return defaults;
        }

        let parsed = fs::read_to_string(config_file)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_toml(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save_to(config_file);
                }
                config
            }
            Err(e) => {
                logger::warn!(
                    "Ignoring unreadable config {}: {e}",
                    config_file.display()
                );
                defaults
            }
        }
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration as pretty TOML to `config_file`
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Contribution categories challenges may use
    ///
    /// Unknown entries are skipped with a warning. An empty result means
    /// every category is allowed.
    #[must_use]
    pub fn challenge_kinds(&self) -> Vec<ContributionKind> {
        let Some(types) = &self.challenges.types else {
            return Vec::new();
        };
        let mut kinds = Vec::with_capacity(types.len());
        for raw in types {
            match raw.parse::<ContributionKind>() {
                Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Ok(_) => {}
                Err(e) => logger::warn!("Skipping challenge type in config: {e}"),
            }
        }
        kinds
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `data_dir`, `reports_dir`, `types`.
    /// `types` is rendered as a comma-separated list.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "data_dir" | "data-dir" => Some(self.paths.data_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "types" => Some(
                self.challenges
                    .types
                    .as_deref()
                    .map(|t| t.join(","))
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// `verbose` must be `true`/`false`, `level` a known log level and `types`
    /// a comma-separated list of contribution categories (empty for all).
    /// Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                let level: logger::Level = value.parse()?;
                self.logging.level = level.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "data_dir" | "data-dir" => self.paths.data_dir = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "types" => {
                let kinds = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::parse::<ContributionKind>)
                    .collect::<Result<Vec<_>, _>>()?;
                self.challenges.types = Some(kinds.iter().map(|k| k.slug().to_string()).collect());
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_dir" | "data-dir" => self.paths.data_dir.clone_from(&defaults.paths.data_dir),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "types" => self
                .challenges
                .types
                .clone_from(&defaults.challenges.types),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// The next [`load()`](Config::load) recreates it from defaults.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_dir = \"{}\"", self.paths.data_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[challenges]")?;
        let types: Vec<String> = self
            .challenges
            .types
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect();
        writeln!(f, "  types = [{}]", types.join(", "))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_types_normalizes_to_slugs() {
        let mut config = Config::default();
        config.set("types", "Plant Care, kindness,ANIMALCARE").unwrap();
        assert_eq!(
            config.challenges.types,
            Some(vec![
                "plant-care".to_string(),
                "kindness".to_string(),
                "animal-care".to_string()
            ])
        );
        assert_eq!(config.get("types").unwrap(), "plant-care,kindness,animal-care");
    }

    #[test]
    fn set_types_rejects_unknown_category() {
        let mut config = Config::default();
        assert!(config.set("types", "cleanliness,juggling").is_err());
        assert!(config.challenges.types.is_none());
    }

    #[test]
    fn set_level_rejects_unknown_level() {
        let mut config = Config::default();
        assert!(config.set("level", "shouty").is_err());
        config.set("level", "WARNING").unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn empty_types_means_every_category() {
        let mut config = Config::default();
        config.set("types", "").unwrap();
        assert_eq!(config.challenges.types, Some(Vec::new()));
        assert!(config.challenge_kinds().is_empty());
    }

    #[test]
    fn challenge_kinds_skips_unknown_and_duplicates() {
        let mut config = Config::default();
        config.challenges.types = Some(vec![
            "donation".to_string(),
            "mystery".to_string(),
            "Donation".to_string(),
            "other".to_string(),
        ]);
        assert_eq!(
            config.challenge_kinds(),
            vec![ContributionKind::Donation, ContributionKind::Other]
        );
    }

    #[test]
    fn store_path_lives_in_data_dir() {
        let mut config = Config::default();
        config.paths.data_dir = "/tmp/cityaid-data".to_string();
        assert_eq!(
            config.store_path(),
            PathBuf::from("/tmp/cityaid-data/store.json")
        );
    }
}
