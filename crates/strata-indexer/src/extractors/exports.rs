//! Exported symbol names

/// Exported declarations in ES module syntax, then top-level Python `def`
/// and `class` names. Order is preserved and duplicates are kept.
pub fn extract_exports(content: &str) -> Vec<String> {
    let es = regex!(
        r"\bexport\s+(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:async\s+)?(?:function\s*\*?|class|const|let|var|interface|type|enum)\s+([A-Za-z_$][\w$]*)"
    );
    let python = regex!(r"(?m)^(?:async\s+)?(?:def|class)\s+([A-Za-z_]\w*)");

    es.captures_iter(content)
        .chain(python.captures_iter(content))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
