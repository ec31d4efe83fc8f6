use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub quota: QuotaSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub meetings: MeetingSettings,
    #[serde(default)]
    pub greeting: GreetingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotaSettings {
    #[serde(default = "default_daily_super_likes")]
    pub daily_super_likes: u32,
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            daily_super_likes: default_daily_super_likes(),
        }
    }
}

fn default_daily_super_likes() -> u32 {
    3
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_shared_hobby_weight")]
    pub shared_hobby: u32,
    #[serde(default = "default_shared_food_weight")]
    pub shared_food: u32,
    #[serde(default = "default_same_city_bonus")]
    pub same_city_bonus: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            shared_hobby: default_shared_hobby_weight(),
            shared_food: default_shared_food_weight(),
            same_city_bonus: default_same_city_bonus(),
        }
    }
}

fn default_shared_hobby_weight() -> u32 { 2 }
fn default_shared_food_weight() -> u32 { 2 }
fn default_same_city_bonus() -> u32 { 5 }

impl From<WeightsConfig> for ScoringWeights {
    fn from(cfg: WeightsConfig) -> Self {
        Self {
            shared_hobby: cfg.shared_hobby,
            shared_food: cfg.shared_food,
            same_city_bonus: cfg.same_city_bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingSettings {
    /// How long a verification code stays usable past the meeting date
    #[serde(default = "default_code_validity_hours")]
    pub code_validity_hours: i64,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            code_validity_hours: default_code_validity_hours(),
            code_length: default_code_length(),
        }
    }
}

fn default_code_validity_hours() -> i64 { 24 }
fn default_code_length() -> usize { 6 }

#[derive(Debug, Clone, Deserialize)]
pub struct GreetingSettings {
    /// First-contact text sent on match acceptance; `{from}` is replaced
    /// with the sender's username
    #[serde(default = "default_greeting_template")]
    pub template: String,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self {
            template: default_greeting_template(),
        }
    }
}

fn default_greeting_template() -> String {
    "Hi, {from} here! Our tables matched, shall we pick a place?".to_string()
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TABLY_)
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with TABLY_)
            // e.g., TABLY_QUOTA__DAILY_SUPER_LIKES -> quota.daily_super_likes
            .add_source(
                Environment::with_prefix("TABLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TABLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
