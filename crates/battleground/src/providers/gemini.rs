//! Gemini `generateContent` client for the adversary.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use coordination::{BackendError, PromptBackend};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, classify_transport, join_url};
use crate::config::GeminiConfig;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, BackendError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(BackendError::Malformed(
            "response contained no candidate text".into(),
        ));
    }
    Ok(text)
}

/// Header carrying the API key; keeps it out of the URL and so out of error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Adversary backend.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build Gemini HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        join_url(&self.base_url, &format!("models/{}:generateContent", model))
    }
}

#[async_trait]
impl PromptBackend for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        if self.api_key.trim().is_empty() {
            return Err(BackendError::MissingApiKey("gemini".into()));
        }
        debug!(model, prompt_chars = prompt.len(), "gemini request");

        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;
        let response = check_status(response).await?;
        let parsed: GenerateContentResponse = response.json().await.map_err(classify_transport)?;
        extract_text(parsed)
    }
}
