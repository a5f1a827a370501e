//! Prompt templates

use crate::bridge::FileRef;

pub const SUMMARY_SYSTEM: &str = "You are a code analysis assistant. Return valid JSON only.";
pub const CONNECTION_SYSTEM: &str = "You are a code analysis assistant.";

const SUMMARY_CONTENT_CHARS: usize = 4000;
const CONNECTION_CONTENT_CHARS: usize = 3000;

/// First `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn summary_prompt(content: &str, filename: &str) -> String {
    format!(
        r#"Analyze this file "{filename}" and return a JSON object with:
- "summary": A 2-3 sentence description of what this file does
- "exports": Array of exported function/class names
- "apiCalls": Array of external API calls or HTTP requests made

File content:
```
{}
```"#,
        truncate_chars(content, SUMMARY_CONTENT_CHARS)
    )
}

pub fn connection_prompt(file_a: &FileRef, file_b: &FileRef) -> String {
    format!(
        r#"Explain how these two files relate to each other in a software architecture context. Be concise but insightful.

File A: {}
```
{}
```

File B: {}
```
{}
```"#,
        file_a.path,
        truncate_chars(&file_a.content, CONNECTION_CONTENT_CHARS),
        file_b.path,
        truncate_chars(&file_b.content, CONNECTION_CONTENT_CHARS),
    )
}
