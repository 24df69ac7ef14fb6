use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timecode::frame_rate::FrameRate;

const CONFIG_DIR_NAME: &str = "tccalc";
const CONFIG_FILE_NAME: &str = "config.json";

/// User preferences for the calculator shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rate label selected at startup, e.g. "29.97"
    pub frame_rate: String,
    /// Show the total frame count next to the readout
    pub show_frame_count: bool,
    /// Show elapsed wall-clock seconds next to the readout
    pub show_wall_clock: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default().label().to_string(),
            show_frame_count: false,
            show_wall_clock: false,
        }
    }
}

/// Configuration manager for calculator settings
/// Keeps the persisted values separate from the schema describing the available options.
/// Settings are stored in `<config dir>/tccalc/config.json` by default
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

/// Available configuration options with validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    pub frame_rate: ConfigOption<String>,
    pub show_frame_count: ConfigOption<bool>,
    pub show_wall_clock: ConfigOption<bool>,
}

/// Configuration option with validation and available choices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption<T> {
    pub default: T,
    pub valid_range: Option<(T, T)>,
    pub valid_choices: Option<Vec<T>>,
    pub description: String,
}

/// Persisted configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub settings: Settings,
    pub created_at: String,
    pub modified_at: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    /// If no path is provided, defaults to the user's config directory, or `config.json` in
    /// the working directory when there is none
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(Self::default_path);

        Self {
            config_path,
            settings: Settings::default(),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Load settings from configuration file
    /// Writes a default file first if none exists
    pub fn load(&mut self) -> Result<Settings, ConfigError> {
        if !self.config_path.exists() {
            log::info!("Creating default config at {}", self.config_path.display());
            self.save()?;
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config_file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config_file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Config file version {} doesn't match application version {}. Using defaults for new settings.",
                config_file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        Self::validate_settings(&config_file.settings).map_err(ConfigError::ValidationError)?;

        self.settings = config_file.settings;
        Ok(self.settings.clone())
    }

    /// Save current settings to configuration file
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        let created_at = self
            .existing_created_at()
            .unwrap_or_else(|| now.clone());

        let config_file = ConfigFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings: self.settings.clone(),
            created_at,
            modified_at: now,
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn existing_created_at(&self) -> Option<String> {
        let content = fs::read_to_string(&self.config_path).ok()?;
        let config_file: ConfigFile = serde_json::from_str(&content).ok()?;
        Some(config_file.created_at)
    }

    /// Validate, update and save settings
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        Self::validate_settings(&settings).map_err(ConfigError::ValidationError)?;
        self.settings = settings;
        self.save()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The configured frame rate, parsed
    pub fn frame_rate(&self) -> Result<FrameRate, ConfigError> {
        FrameRate::parse(&self.settings.frame_rate)
            .map_err(|e| ConfigError::ValidationError(vec![e.to_string()]))
    }

    /// Get configuration schema with available options
    pub fn schema() -> ConfigSchema {
        ConfigSchema {
            frame_rate: ConfigOption {
                default: FrameRate::default().label().to_string(),
                valid_range: None,
                valid_choices: Some(
                    FrameRate::ALL
                        .iter()
                        .map(|rate| rate.label().to_string())
                        .collect(),
                ),
                description: "Frame rate selected when the calculator starts".to_string(),
            },
            show_frame_count: ConfigOption {
                default: false,
                valid_range: None,
                valid_choices: None,
                description: "Show the total frame count next to the timecode".to_string(),
            },
            show_wall_clock: ConfigOption {
                default: false,
                valid_range: None,
                valid_choices: None,
                description: "Show elapsed real time, which differs from the timecode at 23.976, 29.97 and 59.94".to_string(),
            },
        }
    }

    /// Validate settings against schema
    pub fn validate_settings(settings: &Settings) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let schema = Self::schema();

        if let Some(choices) = &schema.frame_rate.valid_choices {
            if !choices.contains(&settings.frame_rate) {
                errors.push(format!("frame_rate must be one of: {:?}", choices));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Reset settings to defaults
    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.settings = Settings::default();
        self.save()
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Config validation errors: {}", .0.join(", "))]
    ValidationError(Vec<String>),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_manager_new() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.json");

        let manager = ConfigManager::new(Some(config_path.clone()));
        assert_eq!(manager.config_path(), config_path);
        assert_eq!(manager.settings(), &Settings::default());
        assert_eq!(manager.frame_rate().unwrap(), FrameRate::Fps29_97);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        let settings = manager.load().unwrap();

        assert_eq!(settings, Settings::default());
        assert!(config_path.exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));

        let settings = Settings {
            frame_rate: "25".to_string(),
            show_frame_count: true,
            ..Settings::default()
        };
        manager.update_settings(settings).unwrap();

        let mut manager2 = ConfigManager::new(Some(config_path));
        let loaded_settings = manager2.load().unwrap();

        assert_eq!(loaded_settings.frame_rate, "25");
        assert!(loaded_settings.show_frame_count);
        assert!(!loaded_settings.show_wall_clock);
        assert_eq!(manager2.frame_rate().unwrap(), FrameRate::Fps25);
    }

    #[test]
    fn test_update_rejects_unsupported_rate() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new(Some(temp_dir.path().join("config.json")));

        let settings = Settings {
            frame_rate: "48".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            manager.update_settings(settings),
            Err(ConfigError::ValidationError(_))
        ));
        assert_eq!(manager.settings(), &Settings::default());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        std::fs::write(&config_path, "not json").unwrap();
        let mut manager = ConfigManager::new(Some(config_path.clone()));
        assert!(matches!(manager.load(), Err(ConfigError::ParseError(_))));

        let bad_rate = r#"{
            "version": "0.0.1",
            "settings": { "frame_rate": "12" },
            "created_at": "",
            "modified_at": ""
        }"#;
        std::fs::write(&config_path, bad_rate).unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_reset_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let mut manager = ConfigManager::new(Some(config_path.clone()));

        manager
            .update_settings(Settings {
                frame_rate: "60".to_string(),
                show_frame_count: true,
                show_wall_clock: true,
            })
            .unwrap();
        manager.reset_to_defaults().unwrap();

        let mut reloaded = ConfigManager::new(Some(config_path));
        assert_eq!(reloaded.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_error_messages() {
        let error = ConfigError::ValidationError(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(error.to_string(), "Config validation errors: a, b");

        let error = ConfigError::ReadError("denied".to_string());
        assert_eq!(error.to_string(), "Failed to read config file: denied");
    }

    #[test]
    fn test_schema_lists_every_rate() {
        let schema = ConfigManager::schema();
        let choices = schema.frame_rate.valid_choices.unwrap();
        assert_eq!(choices.len(), FrameRate::ALL.len());
        assert!(choices.contains(&schema.frame_rate.default));
        assert!(!schema.show_wall_clock.description.is_empty());
    }
}
