//! Local provider for offline summaries

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use crate::bridge::{AiProvider, FileRef, FileSummary};

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("built-in pattern must compile")
}

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"export\s+(?:default\s+)?(?:function|class|const|let|var|interface|type|enum)\s+(\w+)")
});
static PY_DEF_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?m)^(?:def|class)\s+(\w+)"));
static FETCH_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?:fetch|axios|http|request)\s*\(\s*['"`]([^'"`]+)"#));

const UNAVAILABLE: &str = "**Connection Analysis** (AI unavailable)\n\n\
Enable AI by setting GROQ_API_KEY (free & fast) or OPENAI_API_KEY in .env.";

pub struct LocalProvider;

impl LocalProvider {
    pub fn new() -> Self {
        Self
    }

    /// Line count, defined names and outbound requests, found by pattern.
    pub fn basic_summary(content: &str, filename: &str) -> FileSummary {
        let captures = |re: &Regex| -> Vec<String> {
            re.captures_iter(content).map(|c| c[1].to_string()).collect()
        };

        let mut defined = captures(&*EXPORT_RE);
        defined.extend(captures(&*PY_DEF_RE));
        let api_calls = captures(&*FETCH_RE);

        let ext = filename.rsplit('.').next().unwrap_or(filename).to_lowercase();
        let language = match ext.as_str() {
            "ts" => "TypeScript".to_string(),
            "tsx" => "React TypeScript".to_string(),
            "js" => "JavaScript".to_string(),
            "jsx" => "React JavaScript".to_string(),
            "py" => "Python".to_string(),
            "go" => "Go".to_string(),
            "rs" => "Rust".to_string(),
            "java" => "Java".to_string(),
            other => other.to_uppercase(),
        };

        let mut summary = format!("A {} file with {} lines.", language, content.split('\n').count());
        if !defined.is_empty() {
            let shown = defined.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
            if defined.len() > 5 {
                summary.push_str(&format!(" Defines: {shown} and {} more.", defined.len() - 5));
            } else {
                summary.push_str(&format!(" Defines: {shown}."));
            }
        }
        if !api_calls.is_empty() {
            summary.push_str(" Makes external API calls.");
        }

        FileSummary {
            summary,
            exports: defined,
            api_calls,
        }
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiProvider for LocalProvider {
    async fn summarize_file(&self, content: &str, filename: &str) -> Result<FileSummary> {
        Ok(Self::basic_summary(content, filename))
    }

    async fn explain_connection(&self, _file_a: &FileRef, _file_b: &FileRef) -> Result<String> {
        Ok(UNAVAILABLE.to_string())
    }

    fn name(&self) -> &str {
        "Local (Heuristic)"
    }
}
