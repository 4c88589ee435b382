//! Google Gemini repair provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::RepairError;

use super::prompts;
use super::provider::{RepairConfig, RepairProvider, strip_code_fence};

/// Gemini API endpoint prefix; the model name and key complete it.
const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Harm categories blocked at medium and above.
const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Repair provider backed by the Gemini `generateContent` API.
pub struct GeminiRepairer {
    client: Client,
    api_key: String,
    config: RepairConfig,
}

impl GeminiRepairer {
    /// Create a provider with the given API key and default configuration.
    ///
    /// The key is format-checked only; it is never verified server-side
    /// before the first call.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RepairError> {
        Self::with_config(api_key, RepairConfig::default())
    }

    /// Create a provider with custom configuration.
    pub fn with_config(
        api_key: impl Into<String>,
        config: RepairConfig,
    ) -> Result<Self, RepairError> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;

        let client = Client::builder()
            .timeout(config.deadline)
            .build()
            .map_err(|e| RepairError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            config,
        })
    }

    /// Create from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, RepairError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            RepairError::InvalidCredential(
                "GEMINI_API_KEY environment variable not set".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let safety_settings: Vec<serde_json::Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| {
                json!({
                    "category": category,
                    "threshold": "BLOCK_MEDIUM_AND_ABOVE"
                })
            })
            .collect();

        json!({
            "contents": [
                {
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens
            },
            "safetySettings": safety_settings
        })
    }

    /// Get the configuration for this provider.
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }
}

#[async_trait]
impl RepairProvider for GeminiRepairer {
    async fn repair(&self, raw_text: &str) -> Result<String, RepairError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_URL, self.config.model, self.api_key
        );
        let body = self.request_body(&prompts::repair_prompt(raw_text));

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RepairError::Timeout(self.config.deadline)
                } else {
                    RepairError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RepairError::Service { code, message });
        }

        let api_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RepairError::Transport(format!("failed to decode response: {e}")))?;

        // The service may refuse to answer; only the first candidate is read.
        let text = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(RepairError::EmptyResponse)?;

        Ok(strip_code_fence(&text))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Syntactic credential pre-check: non-empty, minimum length, vendor prefix.
pub fn validate_api_key(api_key: &str) -> Result<(), RepairError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(RepairError::InvalidCredential(
            "API key is empty".to_string(),
        ));
    }
    if key.len() < 30 {
        return Err(RepairError::InvalidCredential(
            "API key is too short".to_string(),
        ));
    }
    if !key.starts_with("AIza") {
        return Err(RepairError::InvalidCredential(
            "API key does not look like a Google AI key (expected 'AIza' prefix)".to_string(),
        ));
    }
    Ok(())
}

/// Gemini API response structure.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
