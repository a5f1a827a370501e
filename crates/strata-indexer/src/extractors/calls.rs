//! Heuristic call tracing
//!
//! Finds two usage patterns of a file's resolved imports: member calls on a
//! module alias (`users.getUser(`) and direct calls of named imports
//! (`getUser(`). There is no scope or alias analysis, so results are neither
//! sound nor complete.

use regex::Regex;
use strata_core::{CallTrace, basename};

use super::imports::{ImportStatement, parse_import_statements};

/// A relative import that resolved to a node in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Path produced by the import extractor.
    pub import: String,
    /// Id of the node it resolved to.
    pub target: String,
}

/// Symbols called on each resolved import target, in target order.
///
/// Targets with no observed calls are omitted. A name preceded by `.` is a
/// property access and does not count.
pub fn trace_calls(content: &str, file_path: &str, resolved: &[ResolvedImport]) -> Vec<CallTrace> {
    let statements = parse_import_statements(content, file_path);
    let mut traces: Vec<CallTrace> = Vec::new();

    for import in resolved {
        let bound: Vec<&ImportStatement> = statements
            .iter()
            .filter(|stmt| stmt.resolved == import.import)
            .collect();

        let mut functions: Vec<String> = Vec::new();
        for alias in module_aliases(&import.target, &bound) {
            functions.extend(member_calls(content, &alias));
        }
        for (imported, local) in bound.iter().flat_map(|stmt| stmt.named.iter()) {
            if is_called(content, local) {
                functions.push(imported.clone());
            }
        }

        let functions = super::dedup_ordered(functions);
        if functions.is_empty() {
            continue;
        }
        match traces.iter_mut().find(|trace| trace.target == import.target) {
            Some(existing) => {
                existing.functions =
                    super::dedup_ordered(existing.functions.drain(..).chain(functions));
            }
            None => traces.push(CallTrace {
                target: import.target.clone(),
                functions,
            }),
        }
    }

    traces
}

/// Names the module may be referred to by: its file stem plus any default or
/// namespace binding.
fn module_aliases(target: &str, bound: &[&ImportStatement]) -> Vec<String> {
    let mut aliases = vec![module_stem(target)];
    for stmt in bound {
        aliases.extend(stmt.default.iter().cloned());
        aliases.extend(stmt.namespace.iter().cloned());
    }
    super::dedup_ordered(aliases.into_iter().filter(|alias| !alias.is_empty()))
}

/// `services/user.ts` -> `user`; `services/user/index.ts` -> `user`.
fn module_stem(target: &str) -> String {
    let name = basename(target);
    let stem = name.split('.').next().unwrap_or(name);
    if matches!(stem, "index" | "__init__") {
        let parent = target.rsplit('/').nth(1).unwrap_or(stem);
        return parent.to_string();
    }
    stem.to_string()
}

fn member_calls(content: &str, alias: &str) -> Vec<String> {
    let pattern = format!(
        r"(?m)(?:^|[^\w$.]){}\s*\.\s*([A-Za-z_$][\w$]*)\s*\(",
        regex::escape(alias)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    re.captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn is_called(content: &str, name: &str) -> bool {
    let pattern = format!(r"(?m)(?:^|[^\w$.]){}\s*\(", regex::escape(name));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(content))
}
