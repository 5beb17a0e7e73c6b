use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::GeneratorSettings;

/// Errors that can occur when talking to the text-generation service
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generator returned status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for an Ollama-compatible `/api/generate` endpoint
///
/// Generated text is advisory: callers that only need a score should use
/// [`GeneratorClient::generate_or_empty`] and let the score extractor fall
/// back to its default.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    base_url: String,
    model: String,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    client: Client,
}

impl GeneratorClient {
    pub fn new(settings: &GeneratorSettings) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt with an optional system instruction and return the
    /// generated text
    pub async fn generate(&self, prompt: &str, system: &str) -> Result<String, GeneratorError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                top_p: self.top_p,
                max_tokens: self.max_tokens,
            },
        };

        tracing::debug!("Querying {} ({} prompt chars)", self.model, prompt.len());

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(GeneratorError::Status(response.status().as_u16()));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        Ok(parsed.response.unwrap_or_default())
    }

    /// Like [`generate`](Self::generate), but failures are logged and turned
    /// into empty text
    pub async fn generate_or_empty(&self, prompt: &str, system: &str) -> String {
        match self.generate(prompt, system).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Text generation failed, continuing without it: {}", e);
                String::new()
            }
        }
    }
}
