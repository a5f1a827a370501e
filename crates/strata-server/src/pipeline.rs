//! Per-request analysis: fetch, analyze, summarize, cache
//!
//! Metadata and tree are requested together; file contents are fetched in
//! batches of `fetch_batch_size`. A result is cached only once the whole
//! pipeline has succeeded.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use strata_core::{
    AnalysisError, Graph, GraphError, RepoEdge, RepoMeta, RepoNode, Role, SchemaEntity, TtlCache,
};
use strata_github::{RepoId, RepoSource, detect_primary_language, parse_github_url};
use strata_indexer::analysis::schema_candidates;
use strata_indexer::{AnalysisConfig, SchemaSelection, filter_architecture, parse_schema};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MermaidDiagrams {
    /// Architecture flowchart
    pub flow: String,
    /// First endpoint's sequence diagram, or empty
    pub sequence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_files: usize,
    pub total_folders: usize,
    pub parsed_files: usize,
    pub api_endpoints: usize,
    pub schema_files: usize,
    pub entry_points: usize,
    pub services: usize,
    pub models: usize,
    pub external_apis: usize,
    pub analysis_time_ms: u64,
    pub cached: bool,
}

/// Everything the presentation layer needs for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub summary: String,
    pub meta: RepoMeta,
    pub nodes: Vec<RepoNode>,
    pub edges: Vec<RepoEdge>,
    /// Text of every parsed file, by path
    pub file_contents: BTreeMap<String, String>,
    pub erd_diagram: String,
    /// Sequence diagram per API endpoint path
    pub logic_flows: BTreeMap<String, String>,
    pub mermaid: MermaidDiagrams,
    pub schema_entities: Vec<SchemaEntity>,
    pub stats: AnalysisStats,
}

impl AnalysisResponse {
    /// Reduce nodes and edges to files with an architectural role or a
    /// dependency, plus their folders.
    pub fn architecture_view(mut self) -> Result<Self, GraphError> {
        let mut graph = Graph::new();
        for node in std::mem::take(&mut self.nodes) {
            graph.add_node(node);
        }
        for edge in std::mem::take(&mut self.edges) {
            graph.add_edge(edge)?;
        }
        let (nodes, edges) = filter_architecture(&graph)?.into_parts();
        self.nodes = nodes;
        self.edges = edges;
        Ok(self)
    }
}

pub struct Analyzer {
    source: Arc<dyn RepoSource>,
    results: Arc<TtlCache<AnalysisResponse>>,
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(
        source: Arc<dyn RepoSource>,
        results: Arc<TtlCache<AnalysisResponse>>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            source,
            results,
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Turn user input into a repository id, or an input error.
    pub fn parse_request(url: &str) -> Result<RepoId, AnalysisError> {
        if url.trim().is_empty() {
            return Err(AnalysisError::InvalidRepository("URL is required".to_string()));
        }
        parse_github_url(url).ok_or_else(|| {
            AnalysisError::InvalidRepository(
                "Invalid GitHub URL. Expected format: github.com/owner/repo".to_string(),
            )
        })
    }

    pub async fn analyze_url(&self, url: &str) -> Result<AnalysisResponse, AnalysisError> {
        let repo = Self::parse_request(url)?;
        self.analyze(&repo).await
    }

    pub async fn analyze(&self, repo: &RepoId) -> Result<AnalysisResponse, AnalysisError> {
        let key = repo.to_string();
        if let Some(cached) = self.results.get(&key) {
            tracing::info!("Cache hit: {}", key);
            return Ok(cached);
        }
        tracing::info!("Cache miss, analyzing {} via {}", key, self.source.name());
        let started = Instant::now();

        let (meta, tree) = tokio::try_join!(
            self.source.get_meta(repo),
            self.source.get_tree(repo, "HEAD")
        )
        .map_err(|err| {
            if err.is_not_found() {
                AnalysisError::InvalidRepository(format!("Repository {key} not found"))
            } else {
                AnalysisError::Source(err.to_string())
            }
        })?;

        let language = meta
            .language
            .clone()
            .filter(|language| !language.is_empty())
            .unwrap_or_else(|| detect_primary_language(&tree));

        let parseable = self.config.select_parseable_files(&tree);
        let file_contents = self.fetch_files(repo, &parseable).await;
        tracing::debug!("Fetched {}/{} parseable files", file_contents.len(), parseable.len());

        let mut contents = file_contents.clone();
        self.fetch_schemas(repo, &schema_candidates(&tree), &mut contents).await;

        let analysis = strata_indexer::analyze(&tree, &contents, &self.config)?;

        let total_files = tree.iter().filter(|item| item.is_blob()).count();
        let total_folders = tree.len() - total_files;
        let api_endpoints = analysis.api_endpoints();
        let schema_files = analysis.schema_files.len();
        let (nodes, edges) = analysis.graph.into_parts();

        let count_roles = |roles: &[Role]| nodes.iter().filter(|n| roles.contains(&n.role)).count();
        let entry_points = count_roles(&[Role::Entry]);
        let routes = count_roles(&[Role::Api, Role::Controller]);
        let services = count_roles(&[Role::Service]);
        let models = count_roles(&[Role::Model]);
        let external_apis = collect_external_apis(&nodes);

        let mut summary = format!(
            "A {language} repository with {total_files} files. Architecture: {entry_points} entry point(s), \
             {routes} API route(s), {services} service(s), {models} model(s)."
        );
        if !external_apis.is_empty() {
            let shown: Vec<&str> = external_apis.iter().take(5).map(String::as_str).collect();
            summary.push_str(&format!(" External integrations: {}.", shown.join(", ")));
        }

        let elapsed = started.elapsed().as_millis() as u64;
        let logic_flows = analysis.diagrams.sequences;
        let response = AnalysisResponse {
            summary,
            meta: RepoMeta {
                language: Some(language),
                ..meta
            },
            mermaid: MermaidDiagrams {
                flow: analysis.diagrams.architecture,
                sequence: logic_flows.values().next().cloned().unwrap_or_default(),
            },
            logic_flows,
            erd_diagram: analysis.diagrams.erd,
            schema_entities: analysis.schema_entities,
            stats: AnalysisStats {
                total_files,
                total_folders,
                parsed_files: file_contents.len(),
                api_endpoints,
                schema_files,
                entry_points,
                services,
                models,
                external_apis: external_apis.len(),
                analysis_time_ms: elapsed,
                cached: false,
            },
            file_contents,
            nodes,
            edges,
        };

        tracing::info!(
            "Analysis complete: {} in {}ms ({} nodes, {} edges)",
            key,
            elapsed,
            response.nodes.len(),
            response.edges.len()
        );

        let mut cached = response.clone();
        cached.stats.cached = true;
        self.results.set(key, cached);
        tracing::debug!("Result cache: {:?}", self.results.stats());

        Ok(response)
    }

    /// Fetch `paths` in batches, keeping non-empty texts.
    async fn fetch_files(&self, repo: &RepoId, paths: &[String]) -> BTreeMap<String, String> {
        let mut fetched = BTreeMap::new();
        for batch in paths.chunks(self.batch_size()) {
            fetched.extend(self.fetch_batch(repo, batch).await);
        }
        fetched
    }

    /// Fetch schema candidates missing from `contents`, in path order.
    ///
    /// Under [`SchemaSelection::FirstNonEmpty`] fetching stops after the
    /// first batch holding a file that yields an entity.
    async fn fetch_schemas(
        &self,
        repo: &RepoId,
        candidates: &[String],
        contents: &mut BTreeMap<String, String>,
    ) {
        let first_only = self.config.schema_selection == SchemaSelection::FirstNonEmpty;
        for batch in candidates.chunks(self.batch_size()) {
            let missing: Vec<String> = batch
                .iter()
                .filter(|path| !contents.contains_key(*path))
                .cloned()
                .collect();
            contents.extend(self.fetch_batch(repo, &missing).await);

            let found = batch.iter().any(|path| {
                contents
                    .get(path)
                    .is_some_and(|text| !parse_schema(text).is_empty())
            });
            if first_only && found {
                break;
            }
        }
    }

    /// One round of concurrent requests. Failed fetches come back empty and
    /// are dropped.
    async fn fetch_batch(&self, repo: &RepoId, paths: &[String]) -> Vec<(String, String)> {
        let texts = join_all(paths.iter().map(|path| self.source.get_file_content(repo, path))).await;
        paths
            .iter()
            .cloned()
            .zip(texts)
            .filter(|(_, text)| !text.is_empty())
            .collect()
    }

    fn batch_size(&self) -> usize {
        self.config.fetch_batch_size.max(1)
    }
}

/// Distinct external integrations in node order.
fn collect_external_apis(nodes: &[RepoNode]) -> Vec<String> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter_map(|node| node.external_apis.as_ref())
        .flatten()
        .filter(|api| seen.insert(api.as_str()))
        .cloned()
        .collect()
}
