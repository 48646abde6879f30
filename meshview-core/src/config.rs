/// Render configuration loaded from JSON; every field falls back to a default

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::raster::RenderSettings;

/// Output size plus per-frame render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(flatten)]
    pub settings: RenderSettings,
}

fn default_width() -> usize {
    160
}

fn default_height() -> usize {
    90
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            settings: RenderSettings::default(),
        }
    }
}

impl RenderConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(std::io::Error::from)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
