// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Per-environment settings read from `config.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_api_url")]
    pub gemini_api_url: String,
    #[serde(default = "default_model")]
    pub gemini_model: String,
    #[serde(default = "default_timeout")]
    pub translation_timeout_secs: u64,
    #[serde(default = "default_typst_bin")]
    pub typst_bin: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
    #[serde(default = "default_scratch_path")]
    pub scratch_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

fn default_port() -> u16 {
    8000
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_typst_bin() -> String {
    "typst".to_string()
}

fn default_max_upload() -> u64 {
    10 * 1024 * 1024
}

fn default_scratch_path() -> PathBuf {
    std::env::temp_dir().join("cv_builder")
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            gemini_api_url: default_api_url(),
            gemini_model: default_model(),
            translation_timeout_secs: default_timeout(),
            typst_bin: default_typst_bin(),
            max_upload_bytes: default_max_upload(),
            scratch_path: default_scratch_path(),
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment; a missing file means defaults
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config_path = std::env::var("CV_BUILDER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        info!(
            "Loading configuration for environment: {} ({})",
            environment,
            config_path.display()
        );

        let config = if config_path.exists() {
            Self::load_from_file(&config_path, &environment)?
        } else {
            info!("{} not found, using defaults", config_path.display());
            Self::default()
        };

        Ok(Self {
            scratch_path: Self::resolve_path(&config.scratch_path)?,
            ..config
        })
    }

    pub fn get_environment() -> String {
        std::env::var("CV_BUILDER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Pick the `local` or `production` section of a config document
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}
