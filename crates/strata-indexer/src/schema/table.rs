//! `CREATE TABLE` schemas
//!
//! The column list is split on every comma, so a type with arguments such as
//! `DECIMAL(10,2)` ends the body early and its columns are misread.

use strata_core::{SchemaEntity, SchemaField};

/// Parse every `CREATE TABLE` statement, skipping table-level constraints.
pub fn parse_table_schema(content: &str) -> Vec<SchemaEntity> {
    let table = regex!(
        r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?[`"']?(\w+)[`"']?\s*\(([^)]+)\)"#
    );
    let constraint = regex!(r"(?i)^(PRIMARY|FOREIGN|UNIQUE|INDEX|KEY|CONSTRAINT)");
    let column = regex!(r#"^[`"']?(\w+)[`"']?\s+(\w+)"#);
    let primary = regex!(r"(?i)PRIMARY\s+KEY");
    let references = regex!(r"(?i)REFERENCES");

    table
        .captures_iter(content)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let body = caps.get(2)?.as_str();
            let fields = body
                .split(',')
                .map(str::trim)
                .filter(|def| !def.is_empty() && !constraint.is_match(def))
                .filter_map(|def| {
                    let caps = column.captures(def)?;
                    Some(SchemaField {
                        name: caps.get(1)?.as_str().to_string(),
                        field_type: caps.get(2)?.as_str().to_string(),
                        is_primary: primary.is_match(def),
                        is_relation: references.is_match(def),
                    })
                })
                .collect();
            Some(SchemaEntity { name, fields })
        })
        .collect()
}
