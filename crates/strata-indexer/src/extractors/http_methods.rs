//! HTTP verbs declared by route handlers

use super::dedup_ordered;

/// Verbs from method-call routers (`router.get(`), named exports
/// (`export function GET`), and decorators (`@app.post(`), deduplicated.
pub fn detect_http_methods(content: &str) -> Vec<String> {
    let method_call = regex!(r"(?i)(?:router|app)\.(get|post|put|patch|delete)\s*\(");
    let named_export = regex!(r"export\s+(?:async\s+)?function\s+(GET|POST|PUT|PATCH|DELETE)\b");
    let decorator = regex!(r"(?i)@(?:app|router)\.(get|post|put|patch|delete)\s*\(");

    let verbs = method_call
        .captures_iter(content)
        .chain(named_export.captures_iter(content))
        .chain(decorator.captures_iter(content))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase());
    dedup_ordered(verbs)
}
