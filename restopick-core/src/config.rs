//! Configuration management
//!
//! Settings live in `settings.json` in the app directory:
//! ```json
//! {
//!   "app": {
//!     "seedSource": "demo",
//!     "serendipityCount": 4,
//!     "trendingCount": 3,
//!     "defaultMaxDistance": 5.0,
//!     "rngSeed": null,
//!     "logging": true
//!   }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_MAX_DISTANCE;
use crate::services::voting::{DEFAULT_SERENDIPITY_COUNT, DEFAULT_TRENDING_COUNT};

/// Seed source name for the built-in demo office
pub const DEMO_SEED_SOURCE: &str = "demo";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    serendipity_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trending_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_max_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rng_seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logging: Option<bool>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Where the catalog, colleagues and seed votes come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum SeedSource {
    Demo,
    File(PathBuf),
}

impl SeedSource {
    /// Parse a settings value: "demo" or a path to a JSON seed file
    ///
    /// Relative paths are resolved against the app directory.
    pub fn parse(value: &str, app_dir: &Path) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(DEMO_SEED_SOURCE) {
            return SeedSource::Demo;
        }
        let path = PathBuf::from(value);
        if path.is_absolute() {
            SeedSource::File(path)
        } else {
            SeedSource::File(app_dir.join(path))
        }
    }

    fn as_setting(&self) -> String {
        match self {
            SeedSource::Demo => DEMO_SEED_SOURCE.to_string(),
            SeedSource::File(path) => path.display().to_string(),
        }
    }
}

/// RestoPick configuration (resolved view of settings)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub seed_source: SeedSource,
    pub serendipity_count: usize,
    pub trending_count: usize,
    pub default_max_distance: f64,
    /// Fixed seed for the serendipity sampler; random when unset
    pub rng_seed: Option<u64>,
    pub logging: bool,
    // Keep the raw settings for preservation when saving
    #[serde(skip)]
    raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_source: SeedSource::Demo,
            serendipity_count: DEFAULT_SERENDIPITY_COUNT,
            trending_count: DEFAULT_TRENDING_COUNT,
            default_max_distance: DEFAULT_MAX_DISTANCE,
            rng_seed: None,
            logging: true,
            raw_settings: SettingsFile::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load config from the app directory
    ///
    /// A missing or malformed settings file yields defaults. Two environment
    /// variables override the file (for CI/testing):
    /// - RESTOPICK_SEED: fixed sampler seed
    /// - RESTOPICK_LOGGING: enable or disable the event log
    pub fn load(app_dir: &Path) -> Result<Self> {
        let settings_path = app_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let defaults = Config::default();
        let app = &raw.app;

        let rng_seed = match std::env::var("RESTOPICK_SEED").ok() {
            Some(seed) => seed.trim().parse().ok().or(app.rng_seed),
            None => app.rng_seed,
        };
        let logging = std::env::var("RESTOPICK_LOGGING")
            .ok()
            .and_then(|v| parse_bool(v.trim()))
            .or(app.logging)
            .unwrap_or(defaults.logging);

        Ok(Self {
            seed_source: app
                .seed_source
                .as_deref()
                .map(|s| SeedSource::parse(s, app_dir))
                .unwrap_or(defaults.seed_source),
            serendipity_count: app.serendipity_count.unwrap_or(defaults.serendipity_count),
            trending_count: app.trending_count.unwrap_or(defaults.trending_count),
            default_max_distance: app
                .default_max_distance
                .filter(|d| d.is_finite() && *d >= 0.0)
                .unwrap_or(defaults.default_max_distance),
            rng_seed,
            logging,
            raw_settings: raw,
        })
    }

    /// Save config to the app directory, preserving unmanaged settings
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let settings_path = app_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_else(|_| self.raw_settings.clone())
        } else {
            self.raw_settings.clone()
        };

        settings.app.seed_source = Some(self.seed_source.as_setting());
        settings.app.serendipity_count = Some(self.serendipity_count);
        settings.app.trending_count = Some(self.trending_count);
        settings.app.default_max_distance = Some(self.default_max_distance);
        settings.app.rng_seed = self.rng_seed;
        settings.app.logging = Some(self.logging);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Update one setting by its settings.json key
    pub fn set(&mut self, key: &str, value: &str, app_dir: &Path) -> Result<()> {
        let value = value.trim();
        match key {
            "seedSource" => self.seed_source = SeedSource::parse(value, app_dir),
            "serendipityCount" => self.serendipity_count = value.parse()?,
            "trendingCount" => self.trending_count = value.parse()?,
            "defaultMaxDistance" => {
                let distance: f64 = value.parse()?;
                if !distance.is_finite() || distance < 0.0 {
                    bail!("defaultMaxDistance must be a non-negative number, got {}", value);
                }
                self.default_max_distance = distance;
            }
            "rngSeed" => {
                self.rng_seed = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(value.parse()?)
                }
            }
            "logging" => {
                self.logging = match parse_bool(value) {
                    Some(enabled) => enabled,
                    None => bail!("logging must be true or false, got {}", value),
                }
            }
            other => bail!("Unknown setting: {}", other),
        }
        Ok(())
    }
}
