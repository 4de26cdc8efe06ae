// src/core/config_manager.rs
//! Unified configuration: config.yaml section plus environment overrides

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::environment::EnvironmentConfig;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let manager = Self::from_parts(environment, |key| std::env::var(key).ok())?;

        info!(
            "Configuration loaded: port {}, model {}, typst {}",
            manager.environment.port, manager.translation.model, manager.environment.typst_bin
        );
        Ok(manager)
    }

    /// Apply environment overrides on top of the file configuration
    pub fn from_parts<F>(mut environment: EnvironmentConfig, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("ROCKET_PORT") {
            environment.port = port
                .parse::<u16>()
                .context("ROCKET_PORT must be a valid port number")?;
        }
        if let Some(model) = var("GEMINI_MODEL") {
            environment.gemini_model = model;
        }
        if let Some(url) = var("GEMINI_API_URL") {
            environment.gemini_api_url = url;
        }
        if let Some(bin) = var("TYPST_BIN") {
            environment.typst_bin = bin;
        }

        let translation = TranslationConfig {
            api_key: var("GEMINI_API_KEY"),
            api_url: environment.gemini_api_url.clone(),
            model: environment.gemini_model.clone(),
            timeout_seconds: environment.translation_timeout_secs,
        };

        Ok(Self {
            environment,
            translation,
        })
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.environment.scratch_path.clone()
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.environment.scratch_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create directory: {}",
                    self.environment.scratch_path.display()
                )
            })
    }
}
