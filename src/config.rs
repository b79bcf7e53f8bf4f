use crate::error::{config_error, env_error, AppResult};
use crate::utils::time::parse_time;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default trigger phrase for voice commands
pub const DEFAULT_TRIGGER_WORD: &str = "hey assistant";
/// Default daily summary time (HH:MM, local clock)
pub const DEFAULT_SUMMARY_TIME: &str = "08:00";
/// Default Gemini model for intent classification
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
/// Default timeout for classification service calls, in seconds
pub const DEFAULT_CLASSIFY_TIMEOUT_SECS: u64 = 30;

/// User-adjustable settings, persisted to config/settings.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Case-insensitive phrase a spoken utterance must start with
    pub trigger_word: String,
    /// Time of day the daily summary fires (HH:MM)
    pub summary_time: String,
    /// Whether the daily summary is enabled
    pub summary_enabled: bool,
}

/// Partial settings change; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub trigger_word: Option<String>,
    pub summary_time: Option<String>,
    pub summary_enabled: Option<bool>,
}

/// Main configuration structure for the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key for the classification service
    pub gemini_api_key: String,
    /// Gemini model name
    pub gemini_model: String,
    /// Bounded timeout for classification service calls, in seconds
    pub classify_timeout_secs: u64,
    /// Voice trigger phrase, stored lowercase
    pub trigger_word: String,
    /// Daily summary time (HH:MM)
    pub summary_time: String,
    /// Whether the daily summary scheduler fires
    pub summary_enabled: bool,
}

impl Config {
    /// Load configuration from environment and the settings file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let gemini_api_key =
            env::var("GEMINI_API_KEY").map_err(|_| env_error("GEMINI_API_KEY"))?;

        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_GEMINI_MODEL));

        let classify_timeout_secs = env::var("CLASSIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_CLASSIFY_TIMEOUT_SECS);

        // Defaults for user settings, overridden by the settings file if present
        let mut settings = UserSettings {
            trigger_word: String::from(DEFAULT_TRIGGER_WORD),
            summary_time: String::from(DEFAULT_SUMMARY_TIME),
            summary_enabled: true,
        };

        if let Ok(content) = fs::read_to_string("config/settings.toml") {
            if let Ok(saved) = toml::from_str::<UserSettings>(&content) {
                settings = saved;
            }
        }

        let mut config = Config {
            gemini_api_key,
            gemini_model,
            classify_timeout_secs,
            trigger_word: settings.trigger_word,
            summary_time: settings.summary_time,
            summary_enabled: settings.summary_enabled,
        };

        // Trigger phrase comparison is case-insensitive regardless of stored casing
        config.trigger_word = config.trigger_word.trim().to_lowercase();
        if config.trigger_word.is_empty() {
            config.trigger_word = String::from(DEFAULT_TRIGGER_WORD);
        }
        if parse_time(&config.summary_time).is_none() {
            config.summary_time = String::from(DEFAULT_SUMMARY_TIME);
        }

        Ok(config)
    }

    /// Merge a partial settings update into the config, validating each field
    pub fn apply_update(&mut self, update: SettingsUpdate) -> AppResult<()> {
        if let Some(trigger) = update.trigger_word {
            let normalized = trigger.trim().to_lowercase();
            if normalized.is_empty() {
                return Err(config_error("Trigger phrase must not be empty"));
            }
            self.trigger_word = normalized;
        }

        if let Some(time) = update.summary_time {
            if parse_time(&time).is_none() {
                return Err(config_error(&format!(
                    "Invalid summary time '{}', expected HH:MM",
                    time
                )));
            }
            self.summary_time = time;
        }

        if let Some(enabled) = update.summary_enabled {
            self.summary_enabled = enabled;
        }

        Ok(())
    }

    /// Current user settings as a standalone value
    pub fn user_settings(&self) -> UserSettings {
        UserSettings {
            trigger_word: self.trigger_word.clone(),
            summary_time: self.summary_time.clone(),
            summary_enabled: self.summary_enabled,
        }
    }

    /// Save user settings to the settings file
    pub fn save_settings(&self) -> AppResult<()> {
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.user_settings())?;
        fs::write("config/settings.toml", toml_str)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            gemini_api_key: String::new(),
            gemini_model: String::from(DEFAULT_GEMINI_MODEL),
            classify_timeout_secs: DEFAULT_CLASSIFY_TIMEOUT_SECS,
            trigger_word: String::from(DEFAULT_TRIGGER_WORD),
            summary_time: String::from(DEFAULT_SUMMARY_TIME),
            summary_enabled: true,
        }
    }

    #[test]
    fn update_merges_partial_changes() {
        let mut config = test_config();
        config
            .apply_update(SettingsUpdate {
                summary_enabled: Some(false),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.trigger_word, DEFAULT_TRIGGER_WORD);
        assert_eq!(config.summary_time, DEFAULT_SUMMARY_TIME);
        assert!(!config.summary_enabled);
    }

    #[test]
    fn update_normalizes_trigger_to_lowercase() {
        let mut config = test_config();
        config
            .apply_update(SettingsUpdate {
                trigger_word: Some(String::from("  Hey Computer ")),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.trigger_word, "hey computer");
    }

    #[test]
    fn update_rejects_empty_trigger() {
        let mut config = test_config();
        let result = config.apply_update(SettingsUpdate {
            trigger_word: Some(String::from("   ")),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(config.trigger_word, DEFAULT_TRIGGER_WORD);
    }

    #[test]
    fn update_rejects_malformed_summary_time() {
        let mut config = test_config();
        let result = config.apply_update(SettingsUpdate {
            summary_time: Some(String::from("25:99")),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(config.summary_time, DEFAULT_SUMMARY_TIME);
    }
}
