//! Repository identifier parsing

use regex::Regex;
use std::sync::LazyLock;

use crate::source::RepoId;

static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"github\.com/([^/]+)/([^/\s?#]+)", r"^([^/\s]+)/([^/\s?#]+)$"]
        .into_iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Accept `https://github.com/owner/repo[/...]`, `github.com/owner/repo`, or
/// bare `owner/repo`. A trailing `.git` is dropped.
pub fn parse_github_url(text: &str) -> Option<RepoId> {
    let text = text.trim();
    URL_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let owner = caps.get(1)?.as_str();
        let repo = caps.get(2)?.as_str();
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        (!owner.is_empty() && !repo.is_empty()).then(|| RepoId::new(owner, repo))
    })
}
