use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::bounds;
use crate::engine::scoring::{EventType, ScoringVersion};
use crate::session::form::FormDefaults;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub scoring_version: ScoringVersion,
    #[serde(default = "default_event_type")]
    pub default_event_type: String,
    #[serde(default = "default_distance_km")]
    pub default_distance_km: f64,
    #[serde(default = "default_temperature_c")]
    pub default_temperature_c: f64,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_event_type() -> String {
    "run".to_string()
}
fn default_distance_km() -> f64 {
    42.2
}
fn default_temperature_c() -> f64 {
    20.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            scoring_version: ScoringVersion::default(),
            default_event_type: default_event_type(),
            default_distance_km: default_distance_km(),
            default_temperature_c: default_temperature_c(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("grit")
            .join("config.toml")
    }

    /// Reset unknown names and clamp form defaults into their UI ranges.
    pub fn validate(&mut self) {
        if EventType::from_key(&self.default_event_type).is_none() {
            tracing::warn!(
                value = %self.default_event_type,
                "unknown default_event_type, resetting"
            );
            self.default_event_type = default_event_type();
        }
        if !self.default_distance_km.is_finite() {
            self.default_distance_km = default_distance_km();
        }
        if !self.default_temperature_c.is_finite() {
            self.default_temperature_c = default_temperature_c();
        }
        self.default_distance_km = bounds::DISTANCE.clamp(self.default_distance_km);
        self.default_temperature_c = bounds::TEMPERATURE.clamp(self.default_temperature_c);
    }

    pub fn form_defaults(&self) -> FormDefaults {
        FormDefaults {
            event_type: EventType::from_key(&self.default_event_type).unwrap_or(EventType::Run),
            distance_km: self.default_distance_km,
            temperature_c: self.default_temperature_c,
        }
    }
}
