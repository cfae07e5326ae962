//! Groq chat-completions client (OpenAI-compatible).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use coordination::{BackendError, ChatBackend, ChatRequest};
use serde::Deserialize;
use tracing::debug;

use super::{check_status, classify_transport, join_url};
use crate::config::GroqConfig;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn extract_reply(response: ChatCompletionResponse) -> Result<String, BackendError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| BackendError::Malformed("response contained no message content".into()))
}

/// Primary debater, fallback opponent and judge backend.
///
/// The client-level timeout bounds calls without their own budget (the judge);
/// a per-request timeout on a turn takes precedence over it.
pub struct GroqClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build Groq HTTP client")?;
        Ok(Self {
            http,
            endpoint: join_url(&config.base_url, "chat/completions"),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            temperature = request.temperature,
            "groq request"
        );

        let mut builder = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(classify_transport)?;
        let response = check_status(response).await?;
        let body: ChatCompletionResponse = response.json().await.map_err(classify_transport)?;
        extract_reply(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, BackendError> {
        extract_reply(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_extract_first_choice() {
        let reply = parse(
            r#"{"id":"x","choices":[
                {"index":0,"message":{"role":"assistant","content":"first"}},
                {"index":1,"message":{"role":"assistant","content":"second"}}
            ]}"#,
        );
        assert_eq!(reply.unwrap(), "first");
    }

    #[test]
    fn test_missing_content_is_malformed() {
        assert!(matches!(
            parse(r#"{"choices":[]}"#),
            Err(BackendError::Malformed(_))
        ));
        assert!(matches!(
            parse(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#),
            Err(BackendError::Malformed(_))
        ));
        assert!(matches!(parse("{}"), Err(BackendError::Malformed(_))));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = GroqConfig {
            base_url: "https://api.groq.com/openai/v1/".into(),
            api_key: "gsk".into(),
            primary_model: "m".into(),
            opponent_model: "m".into(),
            judge_model: "m".into(),
            timeout_secs: 60,
        };
        let client = GroqClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
