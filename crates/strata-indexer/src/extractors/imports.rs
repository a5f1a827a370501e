//! Relative import statements
//!
//! Recognises ES module imports and re-exports, side-effect imports,
//! CommonJS `require`, and Python relative `from . import` statements. Only
//! sources starting with `.` are kept; packages are not part of the graph.

use strata_core::parent_path;

use super::dedup_ordered;

/// One relative import together with the local names it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Specifier as written, e.g. `./services/user` or `..models`.
    pub source: String,
    /// Repository-relative path with `.` and `..` segments applied, without
    /// any extension probing.
    pub resolved: String,
    /// Name bound to the whole module (`import x from`, `const x = require`).
    pub default: Option<String>,
    /// Namespace binding (`import * as x`, `from . import x`).
    pub namespace: Option<String>,
    /// `(imported, local)` pairs of named bindings.
    pub named: Vec<(String, String)>,
}

/// Resolved relative imports of a file, deduplicated, in source order.
pub fn extract_imports(content: &str, file_path: &str) -> Vec<String> {
    dedup_ordered(
        parse_import_statements(content, file_path)
            .into_iter()
            .map(|stmt| stmt.resolved),
    )
}

/// Every relative import statement in source order.
pub fn parse_import_statements(content: &str, file_path: &str) -> Vec<ImportStatement> {
    let dir = parent_path(file_path).unwrap_or("");
    let mut found: Vec<(usize, ImportStatement)> = Vec::new();

    let es_import = regex!(
        r#"\bimport\s+(?:type\s+)?((?:[\w$]+\s*,?\s*)?(?:\*\s*as\s+[\w$]+|\{[^}]*\})?)\s*from\s*['"]([^'"]+)['"]"#
    );
    for caps in es_import.captures_iter(content) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let clause = caps.get(1).map_or("", |m| m.as_str());
        if let Some(stmt) = js_statement(dir, source.as_str(), clause) {
            found.push((whole.start(), stmt));
        }
    }

    let re_export = regex!(
        r#"\bexport\s+(?:type\s+)?(\*(?:\s*as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"]+)['"]"#
    );
    for caps in re_export.captures_iter(content) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if let Some(stmt) = js_statement(dir, source.as_str(), "") {
            found.push((whole.start(), stmt));
        }
    }

    let side_effect = regex!(r#"\bimport\s*['"]([^'"]+)['"]"#);
    for caps in side_effect.captures_iter(content) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some(stmt) = js_statement(dir, source.as_str(), "") {
            found.push((whole.start(), stmt));
        }
    }

    let require = regex!(
        r#"(?:\b(?:const|let|var)\s+([\w$]+|\{[^}]*\})\s*=\s*)?\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#
    );
    for caps in require.captures_iter(content) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let binding = caps.get(1).map_or("", |m| m.as_str());
        if let Some(stmt) = js_statement(dir, source.as_str(), binding) {
            found.push((whole.start(), stmt));
        }
    }

    let python = regex!(r"(?m)^[ \t]*from\s+(\.+)([\w.]*)\s+import\s+(\([^)]*\)|[^\n#;]+)");
    for caps in python.captures_iter(content) {
        let (Some(whole), Some(dots), Some(names)) = (caps.get(0), caps.get(1), caps.get(3)) else {
            continue;
        };
        let module = caps.get(2).map_or("", |m| m.as_str());
        for stmt in python_statements(dir, dots.as_str().len(), module, names.as_str()) {
            found.push((whole.start(), stmt));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, stmt)| stmt).collect()
}

fn js_statement(dir: &str, source: &str, clause: &str) -> Option<ImportStatement> {
    if !source.starts_with('.') {
        return None;
    }
    let (default, namespace, named) = parse_clause(clause);
    Some(ImportStatement {
        source: source.to_string(),
        resolved: resolve_relative(dir, source),
        default,
        namespace,
        named,
    })
}

/// Split an import clause such as `React, { a as b }` into its bindings.
fn parse_clause(clause: &str) -> (Option<String>, Option<String>, Vec<(String, String)>) {
    let clause = clause.trim();
    let mut named = Vec::new();
    let mut head = clause;

    if let (Some(open), Some(close)) = (clause.find('{'), clause.rfind('}')) {
        if open < close {
            named = parse_named_list(&clause[open + 1..close]);
            head = &clause[..open];
        }
    }

    let namespace = regex!(r"\*\s*as\s+([\w$]+)")
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let default = if namespace.is_none() {
        let name = head.trim().trim_end_matches(',').trim();
        is_identifier(name).then(|| name.to_string())
    } else {
        head.split(',')
            .map(str::trim)
            .find(|part| is_identifier(part))
            .map(str::to_string)
    };

    (default, namespace, named)
}

/// Parse `a, b as c, type D` (braces already stripped).
fn parse_named_list(list: &str) -> Vec<(String, String)> {
    list.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let entry = entry.strip_prefix("type ").unwrap_or(entry).trim();
            let mut parts = entry.split(" as ").map(str::trim);
            let imported = parts.next().filter(|name| is_identifier(name))?;
            let local = parts.next().unwrap_or(imported);
            is_identifier(local).then(|| (imported.to_string(), local.to_string()))
        })
        .collect()
}

fn python_statements(dir: &str, level: usize, module: &str, names: &str) -> Vec<ImportStatement> {
    let base = python_base(dir, level);
    let names = parse_named_list(names.trim().trim_start_matches('(').trim_end_matches(')'));
    let source = format!("{}{}", ".".repeat(level), module);

    if module.is_empty() {
        // `from . import users` imports sibling modules.
        return names
            .into_iter()
            .map(|(imported, local)| ImportStatement {
                source: format!("{source}{imported}"),
                resolved: join(&base, &imported),
                default: None,
                namespace: Some(local),
                named: Vec::new(),
            })
            .collect();
    }

    vec![ImportStatement {
        source,
        resolved: join(&base, &module.replace('.', "/")),
        default: None,
        namespace: None,
        named: names,
    }]
}

/// Package directory a Python relative import of `level` dots refers to.
fn python_base(dir: &str, level: usize) -> String {
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for _ in 1..level {
        parts.pop();
    }
    parts.join("/")
}

fn join(base: &str, rest: &str) -> String {
    let rest = rest.trim_matches('/');
    match (base.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{rest}"),
    }
}

/// Apply a relative specifier to a directory. `..` above the root is ignored.
pub fn resolve_relative(dir: &str, specifier: &str) -> String {
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in specifier.split('/').filter(|p| !p.is_empty()) {
        match segment {
            "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_es_imports_resolve_against_file_dir() {
        let content = r#"
import { getUser } from './services/user';
import React from 'react';
import type { Props } from "../types";
import * as db from '../../db/client';
"#;
        assert_eq!(
            extract_imports(content, "src/pages/index.ts"),
            vec!["src/pages/services/user", "src/types", "db/client"]
        );
    }

    #[test]
    fn test_multiline_named_import() {
        let content = "import {\n  a,\n  b as c,\n} from './lib/x';\n";
        let stmts = parse_import_statements(content, "src/app.ts");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].resolved, "src/lib/x");
        assert_eq!(
            stmts[0].named,
            vec![("a".to_string(), "a".to_string()), ("b".to_string(), "c".to_string())]
        );
    }

    #[test]
    fn test_default_and_namespace_bindings() {
        let content = "import api, { get } from './api'\nimport * as users from './users'";
        let stmts = parse_import_statements(content, "index.js");
        assert_eq!(stmts[0].default.as_deref(), Some("api"));
        assert_eq!(stmts[0].named, vec![("get".to_string(), "get".to_string())]);
        assert_eq!(stmts[1].namespace.as_deref(), Some("users"));
        assert_eq!(stmts[1].default, None);
    }

    #[test]
    fn test_require_side_effect_and_reexport() {
        let content = r#"
const store = require('./store');
const { save } = require("../persist");
import './styles.css';
export * from './types';
require('lodash');
"#;
        let stmts = parse_import_statements(content, "src/state/index.js");
        let resolved: Vec<&str> = stmts.iter().map(|s| s.resolved.as_str()).collect();
        assert_eq!(
            resolved,
            vec!["src/state/store", "src/persist", "src/state/styles.css", "src/state/types"]
        );
        assert_eq!(stmts[0].default.as_deref(), Some("store"));
        assert_eq!(stmts[1].named, vec![("save".to_string(), "save".to_string())]);
    }

    #[test]
    fn test_python_relative_levels() {
        let content = "from .models import User, Post\nfrom ..core.db import session\nfrom . import utils as u\nfrom os import path\n";
        let stmts = parse_import_statements(content, "app/api/routes.py");
        let resolved: Vec<&str> = stmts.iter().map(|s| s.resolved.as_str()).collect();
        assert_eq!(resolved, vec!["app/api/models", "app/core/db", "app/api/utils"]);
        assert_eq!(stmts[0].named.len(), 2);
        assert_eq!(stmts[2].namespace.as_deref(), Some("u"));
    }

    #[test]
    fn test_python_parenthesised_names() {
        let content = "from .services import (\n    create,\n    delete,\n)\n";
        let stmts = parse_import_statements(content, "pkg/views.py");
        assert_eq!(stmts[0].resolved, "pkg/services");
        assert_eq!(stmts[0].named.len(), 2);
    }

    #[test]
    fn test_duplicates_removed() {
        let content = "import a from './a'\nconst b = require('./a')\n";
        assert_eq!(extract_imports(content, "x.js"), vec!["a"]);
    }

    #[test]
    fn test_resolve_relative_above_root() {
        assert_eq!(resolve_relative("", "../../x"), "x");
        assert_eq!(resolve_relative("a/b", "./c/../d"), "a/b/d");
    }

    #[test]
    fn test_malformed_input_yields_nothing() {
        assert!(extract_imports("import { from '", "a.ts").is_empty());
        assert!(extract_imports("", "a.ts").is_empty());
        assert!(extract_imports("\u{0}\u{ffff} require(", "a.ts").is_empty());
    }
}
