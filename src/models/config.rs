use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::services::compressor::{DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY};

/// CLI configuration loaded from a YAML file.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Directory backing the collection store
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Longest allowed image side after compression
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// JPEG encode quality (0-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".imgstash")
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            max_dimension: default_max_dimension(),
            quality: default_quality(),
        }
    }
}
