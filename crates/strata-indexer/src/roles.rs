//! Architectural role classification
//!
//! Checks run in tiers and the first match wins. Path markers are always
//! evaluated before content, so a file under `controllers/` stays a
//! controller whatever it contains.

use strata_core::Role;

/// Classify a file path, optionally refined by its text.
///
/// Never returns [`Role::Folder`]; callers decide that for directories.
pub fn classify(path: &str, content: Option<&str>) -> Role {
    let lower = path.to_lowercase();

    if is_entry_point(&lower) {
        return Role::Entry;
    }

    if regex!(r"app/api/.*/route\.(ts|js)$").is_match(&lower)
        || regex!(r"pages/api/").is_match(&lower)
    {
        return Role::Api;
    }
    if regex!(r"controllers?/").is_match(&lower)
        || regex!(r"routes?/").is_match(&lower)
        || regex!(r"endpoints?/").is_match(&lower)
    {
        return Role::Controller;
    }

    if let Some(role) = content.and_then(classify_content) {
        return role;
    }

    if regex!(r"services?/").is_match(&lower)
        || regex!(r"providers?/").is_match(&lower)
        || regex!(r"use[A-Z]\w+\.(ts|js)$").is_match(path)
    {
        return Role::Service;
    }

    if regex!(r"models?/").is_match(&lower)
        || lower.contains("schema")
        || regex!(r"migrations?/").is_match(&lower)
        || regex!(r"entities?/").is_match(&lower)
        || lower.contains("prisma")
    {
        return Role::Model;
    }

    if regex!(r"utils?/").is_match(&lower)
        || regex!(r"helpers?/").is_match(&lower)
        || lower.contains("lib/")
        || lower.contains("common/")
    {
        return Role::Util;
    }

    if lower.contains("config") || lower.contains(".env") || lower.contains("settings") {
        return Role::Config;
    }

    if regex!(r"\.(test|spec)\.(ts|js|tsx|jsx)$").is_match(&lower)
        || regex!(r"tests?/").is_match(&lower)
        || lower.contains("__tests__/")
    {
        return Role::Test;
    }

    Role::File
}

fn is_entry_point(lower: &str) -> bool {
    regex!(r"^(server|app|main|index)\.(ts|js|py|go|rs)$").is_match(lower)
        || regex!(r"^src/(server|app|main|index)\.(ts|js)$").is_match(lower)
}

/// Route handler declarations in the file body.
fn classify_content(content: &str) -> Option<Role> {
    if regex!(r"(?i)@?(?:router|app)\.(get|post|put|delete)\s*\(").is_match(content) {
        return Some(Role::Controller);
    }
    if regex!(r"export\s+(?:async\s+)?function\s+(GET|POST|PUT|PATCH|DELETE)\b").is_match(content) {
        return Some(Role::Api);
    }
    None
}
