//! Schema file discovery and parsing

mod block;
mod table;

use std::sync::LazyLock;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use strata_core::SchemaEntity;

pub use block::parse_block_schema;
pub use table::parse_table_schema;

use crate::config::SchemaSelection;

const SCHEMA_GLOBS: [&str; 6] = [
    "**/*schema.prisma",
    "**/*.sql",
    "**/*models.py",
    "**/*schema.{ts,js}",
    "**/*migration/**",
    "**/*migrations/**",
];

static SCHEMA_SET: LazyLock<GlobSet> = LazyLock::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in SCHEMA_GLOBS {
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => tracing::warn!("Skipping schema pattern {}: {}", pattern, err),
        }
    }
    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Schema patterns unavailable: {}", err);
        GlobSet::empty()
    })
});

/// Paths that look like schema definitions, in the order given.
pub fn detect_schema_files<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    paths
        .into_iter()
        .filter(|path| SCHEMA_SET.is_match(path))
        .map(str::to_string)
        .collect()
}

/// Parse one schema file, trying the block format before `CREATE TABLE`.
pub fn parse_schema(content: &str) -> Vec<SchemaEntity> {
    let entities = parse_block_schema(content);
    if !entities.is_empty() {
        return entities;
    }
    parse_table_schema(content)
}

/// Combine per-file results according to `selection`.
///
/// `files` must already be in path order.
pub fn select_entities(
    files: Vec<(String, Vec<SchemaEntity>)>,
    selection: SchemaSelection,
) -> Vec<SchemaEntity> {
    match selection {
        SchemaSelection::FirstNonEmpty => files
            .into_iter()
            .find(|(_, entities)| !entities.is_empty())
            .map(|(path, entities)| {
                tracing::debug!("Using schema from {} ({} entities)", path, entities.len());
                entities
            })
            .unwrap_or_default(),
        SchemaSelection::MergeAll => {
            let mut merged: Vec<SchemaEntity> = Vec::new();
            for (_, entities) in files {
                for entity in entities {
                    if !merged.iter().any(|known| known.name == entity.name) {
                        merged.push(entity);
                    }
                }
            }
            merged
        }
    }
}
