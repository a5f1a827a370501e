//! OpenAI-compatible chat completions provider (OpenAI and Groq)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bridge::{AiProvider, FileRef, FileSummary};
use crate::prompt;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    label: &'static str,
}

impl OpenAiProvider {
    pub fn openai(api_key: String) -> Self {
        Self::with_endpoint(OPENAI_BASE_URL, api_key, "gpt-4o-mini", "OpenAI")
    }

    pub fn groq(api_key: String) -> Self {
        Self::with_endpoint(GROQ_BASE_URL, api_key, "llama-3.3-70b-versatile", "Groq")
    }

    fn with_endpoint(base_url: &str, api_key: String, model: &str, label: &'static str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            label,
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn complete(&self, request: ChatRequest<'_>) -> Result<Option<String>> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.label))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.label, status.as_u16(), error_text);
        }

        let body: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to decode {} response", self.label))?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Read a summary out of model output, keeping the raw text as the summary
/// when it is not the requested JSON object.
pub(crate) fn parse_summary(text: &str) -> FileSummary {
    let json = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    serde_json::from_str(json).unwrap_or_else(|_| FileSummary {
        summary: text.trim().to_string(),
        ..FileSummary::default()
    })
}

#[async_trait::async_trait]
impl AiProvider for OpenAiProvider {
    async fn summarize_file(&self, content: &str, filename: &str) -> Result<FileSummary> {
        let user = prompt::summary_prompt(content, filename);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: prompt::SUMMARY_SYSTEM },
                ChatMessage { role: "user", content: &user },
            ],
            max_tokens: 500,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };
        let text = self.complete(request).await?.unwrap_or_else(|| "{}".to_string());
        Ok(parse_summary(&text))
    }

    async fn explain_connection(&self, file_a: &FileRef, file_b: &FileRef) -> Result<String> {
        let user = prompt::connection_prompt(file_a, file_b);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: prompt::CONNECTION_SYSTEM },
                ChatMessage { role: "user", content: &user },
            ],
            max_tokens: 800,
            response_format: None,
        };
        Ok(self
            .complete(request)
            .await?
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| "No analysis available.".to_string()))
    }

    fn name(&self) -> &str {
        self.label
    }
}
