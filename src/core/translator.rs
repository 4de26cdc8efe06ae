// src/core/translator.rs
//! Translation collaborator: trait seam plus the Gemini HTTP adapter

use anyhow::{Context, Result};

use crate::app_log;
use crate::core::config_manager::TranslationConfig;
use crate::core::prompts::{translation_prompt, translation_schema};
use crate::error::CvError;
use crate::types::cv_data::{ParsedSection, TranslatedSection};
use crate::types::response::{GenerateContentRequest, GenerateContentResponse};

const GENERATE_CONTENT_ACTION: &str = "generateContent";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Maps Arabic sections to English titles, items and icons.
/// Any failure or non-conforming response is fatal for the run.
#[rocket::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        sections: &[ParsedSection],
    ) -> Result<Vec<TranslatedSection>, CvError>;
}

pub struct GeminiTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiTranslator {
    /// Fails when no API key is configured
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY environment variable not set")?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:{}",
            self.api_url, self.model, GENERATE_CONTENT_ACTION
        )
    }
}

#[rocket::async_trait]
impl Translator for GeminiTranslator {
    async fn translate(
        &self,
        sections: &[ParsedSection],
    ) -> Result<Vec<TranslatedSection>, CvError> {
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let request =
            GenerateContentRequest::json_prompt(translation_prompt(sections)?, translation_schema());
        let url = self.endpoint();

        app_log!(
            info,
            "Calling translation service: {} ({} sections)",
            url,
            sections.len()
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CvError::Translation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            app_log!(error, "Translation service error response: {}", error_text);
            return Err(CvError::Translation(format!(
                "Service returned error status {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CvError::Translation(format!("Failed to parse response: {}", e)))?;

        let text = body.text().ok_or_else(|| {
            CvError::Translation(format!(
                "Response contained no text (finish reason: {})",
                body.finish_reason().unwrap_or("unknown")
            ))
        })?;

        parse_translation(&text)
    }
}

/// Strict decode of the model's JSON text
pub fn parse_translation(text: &str) -> Result<Vec<TranslatedSection>, CvError> {
    serde_json::from_str(text.trim()).map_err(|e| {
        app_log!(error, "Non-conforming translation payload: {}", text);
        CvError::Translation(format!("Invalid translation payload: {}", e))
    })
}
