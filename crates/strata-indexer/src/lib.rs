//! Repository analysis: role classification, lexical extraction, schema
//! parsing, and graph construction

/// Compile a regex literal once and hand out a `&'static Regex`.
macro_rules! regex {
    ($pattern:literal) => {{
        static RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
            regex::Regex::new($pattern).expect("built-in pattern must compile")
        });
        &*RE
    }};
}

pub mod analysis;
pub mod config;
pub mod enrichment;
pub mod extractors;
pub mod filter;
pub mod roles;
pub mod schema;
pub mod structure;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub mod test_utils;

pub use analysis::{Analysis, analyze};
pub use config::{AnalysisConfig, SchemaSelection};
pub use enrichment::{Enrichment, NodeEnrichment, apply_enrichment, compute_enrichment};
pub use filter::filter_architecture;
pub use roles::classify;
pub use schema::{detect_schema_files, parse_block_schema, parse_schema, parse_table_schema};
pub use structure::build_structure;
