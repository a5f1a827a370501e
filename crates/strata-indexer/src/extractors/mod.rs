//! Lexical extractors
//!
//! Each extractor is a pure function from file text to structured data. They
//! are pattern based, accept arbitrary input, and return empty results when
//! nothing matches.

pub mod calls;
pub mod exports;
pub mod external_apis;
pub mod http_methods;
pub mod imports;

pub use calls::{ResolvedImport, trace_calls};
pub use exports::extract_exports;
pub use external_apis::detect_external_apis;
pub use http_methods::detect_http_methods;
pub use imports::{ImportStatement, extract_imports, parse_import_statements, resolve_relative};

/// Keep the first occurrence of every item.
pub(crate) fn dedup_ordered(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
