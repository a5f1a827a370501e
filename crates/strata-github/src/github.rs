//! GitHub REST implementation of [`RepoSource`]

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use strata_core::{ItemKind, RepoMeta, TreeItem};

use crate::source::{RepoId, RepoSource, SourceError};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

pub struct GitHubSource {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubSource {
    /// Unauthenticated requests are heavily rate limited; pass a token when
    /// one is available.
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Build `{api_base}/{segments...}` with each segment percent-encoded.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<reqwest::Url, SourceError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|err| SourceError::InvalidUrl(format!("{}: {}", self.api_base, err)))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn headers(&self, accept: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        headers.insert(USER_AGENT, HeaderValue::from_static("strata"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("GitHub token contains invalid header characters; ignoring it"),
            }
        }
        headers
    }

    async fn get(&self, url: reqwest::Url, accept: &'static str) -> Result<reqwest::Response, SourceError> {
        let response = self
            .client
            .get(url.clone())
            .headers(self.headers(accept))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    default_branch: String,
}

impl From<RepoResponse> for RepoMeta {
    fn from(repo: RepoResponse) -> Self {
        RepoMeta {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            default_branch: repo.default_branch,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

/// Keep blobs and trees, dropping submodules and root-level dotfiles.
fn tree_items(response: TreeResponse) -> Vec<TreeItem> {
    response
        .tree
        .into_iter()
        .filter(|entry| !entry.path.is_empty() && !entry.path.starts_with('.'))
        .filter_map(|entry| {
            let kind = match entry.kind.as_str() {
                "blob" => ItemKind::Blob,
                "tree" => ItemKind::Tree,
                _ => return None,
            };
            Some(TreeItem {
                path: entry.path,
                kind,
                size: entry.size,
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl RepoSource for GitHubSource {
    async fn get_meta(&self, repo: &RepoId) -> Result<RepoMeta, SourceError> {
        let url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str()])?;
        let body: RepoResponse = self.get(url, JSON_MEDIA_TYPE).await?.json().await?;
        Ok(body.into())
    }

    async fn get_tree(&self, repo: &RepoId, reference: &str) -> Result<Vec<TreeItem>, SourceError> {
        let mut url = self.endpoint([
            "repos",
            repo.owner.as_str(),
            repo.repo.as_str(),
            "git",
            "trees",
            reference,
        ])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let body: TreeResponse = self.get(url, JSON_MEDIA_TYPE).await?.json().await?;
        if body.truncated {
            tracing::warn!("Tree listing for {} was truncated by the API", repo);
        }
        let items = tree_items(body);
        tracing::debug!("Fetched tree for {} ({} items)", repo, items.len());
        Ok(items)
    }

    async fn get_file_content(&self, repo: &RepoId, path: &str) -> String {
        let segments = ["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"]
            .into_iter()
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        let result = match self.endpoint(segments) {
            Ok(url) => match self.get(url, RAW_MEDIA_TYPE).await {
                Ok(response) => response.text().await.map_err(SourceError::from),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        result.unwrap_or_else(|err| {
            tracing::warn!("Could not fetch {}/{}: {}", repo, path, err);
            String::new()
        })
    }

    fn name(&self) -> &str {
        "GitHub"
    }
}
