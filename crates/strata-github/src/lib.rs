//! Repository source access: GitHub REST client, caching, URL parsing

pub mod cached;
pub mod github;
pub mod language;
pub mod source;
pub mod url;

pub use cached::CachedSource;
pub use github::GitHubSource;
pub use language::detect_primary_language;
pub use source::{RepoId, RepoSource, SourceError};
pub use url::parse_github_url;
