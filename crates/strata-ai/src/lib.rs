//! AI-assisted prose for Strata
//!
//! File summaries and connection explanations, backed by an
//! OpenAI-compatible chat API when a key is configured and by a local
//! heuristic otherwise.

pub mod bridge;
pub mod prompt;
pub mod providers;


pub use bridge::{AiBridge, AiProvider, FileRef, FileSummary};
pub use providers::{ProviderKind, create_provider, provider_from_env};
