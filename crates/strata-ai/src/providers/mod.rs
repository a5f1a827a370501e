//! AI provider implementations

pub mod local;
pub mod openai;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bridge::AiProvider;

/// Which backend answers AI requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    OpenAi,
    Local,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" => Ok(ProviderKind::OpenAi),
            "local" | "none" => Ok(ProviderKind::Local),
            other => anyhow::bail!("Unknown AI provider: {}", other),
        }
    }
}

/// Factory function to create AI providers
pub fn create_provider(kind: ProviderKind, api_key: Option<String>) -> Box<dyn AiProvider> {
    match (kind, api_key) {
        (ProviderKind::Groq, Some(key)) => Box::new(openai::OpenAiProvider::groq(key)),
        (ProviderKind::OpenAi, Some(key)) => Box::new(openai::OpenAiProvider::openai(key)),
        (ProviderKind::Local, _) => Box::new(local::LocalProvider::new()),
        (kind, None) => {
            tracing::warn!("No API key for {:?}; using the local heuristic provider", kind);
            Box::new(local::LocalProvider::new())
        }
    }
}

/// Pick a provider from the process environment.
///
/// Without an override, Groq wins over OpenAI and the local heuristic is the
/// fallback when neither key is set.
pub fn provider_from_env(preferred: Option<ProviderKind>) -> Box<dyn AiProvider> {
    let key = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    let groq = key("GROQ_API_KEY");
    let openai = key("OPENAI_API_KEY");

    let provider = match preferred {
        Some(ProviderKind::Groq) => create_provider(ProviderKind::Groq, groq),
        Some(ProviderKind::OpenAi) => create_provider(ProviderKind::OpenAi, openai),
        Some(ProviderKind::Local) => create_provider(ProviderKind::Local, None),
        None => match (groq, openai) {
            (Some(key), _) => create_provider(ProviderKind::Groq, Some(key)),
            (None, Some(key)) => create_provider(ProviderKind::OpenAi, Some(key)),
            (None, None) => create_provider(ProviderKind::Local, None),
        },
    };
    tracing::info!("AI provider: {}", provider.name());
    provider
}
