//! Gallery configuration module.
//!
//! Handles loading, validating, and merging the optional `config.toml` at the
//! gallery root. Stock defaults are serialized to a TOML table and the user
//! file is merged on top key-by-key, so a config file only needs the values it
//! changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! width = 800        # Canvas width every photo is placed on
//! height = 600       # Canvas height every photo is placed on
//! quality = 85       # JPEG quality (1-100)
//!
//! [events]
//! id_suffix = "event"                         # Derived ids: YYYYMMDD-<suffix>
//! description_template = "{name}の写真です。"  # Default event description
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Canvas, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file within the gallery root.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Largest edge a baseline JPEG can store.
const MAX_JPEG_EDGE: u32 = u16::MAX as u32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Output canvas and JPEG encoding settings.
    pub images: ImagesConfig,
    /// Event id derivation and default description.
    pub events: EventsConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.width == 0 || self.images.height == 0 {
            return Err(ConfigError::Validation(
                "images.width and images.height must be non-zero".into(),
            ));
        }
        if self.images.width > MAX_JPEG_EDGE || self.images.height > MAX_JPEG_EDGE {
            return Err(ConfigError::Validation(format!(
                "images.width and images.height must be at most {MAX_JPEG_EDGE}"
            )));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.events.id_suffix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "events.id_suffix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Normalized image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub width: u32,
    pub height: u32,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            quality: 85,
        }
    }
}

impl ImagesConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

/// Event registration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    /// Appended to the compacted date when no explicit id is given.
    pub id_suffix: String,
    /// Description used when none is given; `{name}` is replaced by the event name.
    pub description_template: String,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            id_suffix: "event".to_string(),
            description_template: "{name}の写真です。".to_string(),
        }
    }
}

impl EventsConfig {
    /// Render the default description for an event called `name`.
    pub fn default_description(&self, name: &str) -> String {
        self.description_template.replace("{name}", name)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the gallery root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Load config for the gallery at `root`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Event Gallery Configuration
# ===========================
#
# Place this file at the gallery root (next to events.json).
# Every key is optional; omitted keys keep the values shown here.

[images]
# Every ingested photo is resized and centered on a white canvas of
# exactly width x height pixels, then stored as JPEG.
width = 800
height = 600
# JPEG quality, 1 (smallest) to 100 (best).
quality = 85

[events]
# Ids of events created without --event-id are the date without separators
# followed by this suffix, e.g. 2025-08-01 -> 20250801-event.
id_suffix = "event"
# Description used when --description is omitted. {name} is the event name.
description_template = "{name}の写真です。"
"##
}
