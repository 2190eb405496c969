use crate::config::{GeminiConfig, GEMINI_API_KEY_VAR};
use crate::error::{ChomptronError, Result};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GeminiProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .ok_or(ChomptronError::MissingCredential(GEMINI_API_KEY_VAR))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(GeminiProvider {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = self.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = self.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }
}

/// Pull the generated text out of a `generateContent` response body.
fn extract_text(body: &Value) -> Result<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array();

    let text: String = parts
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
        return Err(ChomptronError::ProviderError(format!(
            "Prompt was blocked by Gemini: {}",
            reason
        )));
    }

    Err(ChomptronError::ProviderError(
        "Failed to extract content from Gemini response".to_string(),
    ))
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        // Errors end up in HTTP responses, keep the URL out of them
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ChomptronError::from(e.without_url()))?;

        let status = response.status();
        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ChomptronError::from(e.without_url()))?;
        debug!("{:?}", response_body);

        if !status.is_success() {
            let message = response_body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Gemini request failed with status {}", status));
            return Err(ChomptronError::ProviderError(message));
        }

        extract_text(&response_body)
    }
}
