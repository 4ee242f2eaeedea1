use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_prefetch_media")]
    pub prefetch_media: bool,
}

/// GIPHY content rating filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    G,
    #[default]
    Pg,
    #[serde(rename = "pg-13")]
    Pg13,
    R,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::G => "g",
            Rating::Pg => "pg",
            Rating::Pg13 => "pg-13",
            Rating::R => "r",
        }
    }
}

fn default_tick_rate() -> f64 {
    30.0
}

fn default_limit() -> u32 {
    25
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_api_base_url() -> String {
    "https://api.giphy.com/v1".to_string()
}

fn default_prefetch_media() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_fps: default_tick_rate(),
            limit: default_limit(),
            rating: Rating::default(),
            lang: default_lang(),
            api_base_url: default_api_base_url(),
            prefetch_media: default_prefetch_media(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/jiffy/config.toml"))
}

pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        return AppConfig::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("ignoring invalid config file: {e}");
            AppConfig::default()
        }
    }
}
