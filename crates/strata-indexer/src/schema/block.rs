//! `model Name { ... }` block schemas

use strata_core::{SchemaEntity, SchemaField};

/// Parse every `model` block. Lines starting with `//` or `@@` are skipped;
/// `?` and `[]` type modifiers are stripped.
pub fn parse_block_schema(content: &str) -> Vec<SchemaEntity> {
    let block = regex!(r"\bmodel\s+(\w+)\s*\{([^}]+)\}");
    let field = regex!(r"^(\w+)\s+(\S+)");

    block
        .captures_iter(content)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let body = caps.get(2)?.as_str();
            let fields = body
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with("@@"))
                .filter_map(|line| {
                    let caps = field.captures(line)?;
                    Some(SchemaField {
                        name: caps.get(1)?.as_str().to_string(),
                        field_type: caps.get(2)?.as_str().replace('?', "").replace("[]", ""),
                        is_primary: line.contains("@id"),
                        is_relation: line.contains("@relation"),
                    })
                })
                .collect();
            Some(SchemaEntity { name, fields })
        })
        .collect()
}
