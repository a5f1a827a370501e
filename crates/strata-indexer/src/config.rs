//! Analysis configuration

use serde::{Deserialize, Serialize};
use strata_core::{LayoutConfig, TreeItem};

/// How entities from several schema files are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSelection {
    /// Use the first file, in path order, that yields any entity.
    #[default]
    FirstNonEmpty,
    /// Concatenate every file's entities; the first definition of a name wins.
    MergeAll,
}

/// Tunables for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Extensions (lower case, no dot) whose contents are fetched and parsed
    pub parseable_extensions: Vec<String>,
    /// Upper bound on parsed files, taken in tree order
    pub max_parsed_files: usize,
    /// Number of content requests in flight at once
    pub fetch_batch_size: usize,
    pub schema_selection: SchemaSelection,
    pub layout: LayoutConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parseable_extensions: ["ts", "tsx", "js", "jsx", "py", "go", "rs", "java", "rb"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            max_parsed_files: 60,
            fetch_batch_size: 10,
            schema_selection: SchemaSelection::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Whether a path's extension is in `parseable_extensions`.
    pub fn is_parseable(&self, path: &str) -> bool {
        let name = strata_core::basename(path);
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.parseable_extensions.iter().any(|known| *known == ext)
    }

    /// Blob paths to fetch and parse, in tree order, capped at
    /// `max_parsed_files`.
    pub fn select_parseable_files(&self, tree: &[TreeItem]) -> Vec<String> {
        tree.iter()
            .filter(|item| item.is_blob() && self.is_parseable(&item.path))
            .take(self.max_parsed_files)
            .map(|item| item.path.clone())
            .collect()
    }
}
