//! Entity-relationship diagram for parsed schema entities

use std::fmt::Write;

use super::erd_token;
use crate::model::SchemaEntity;

/// Render entities and the relations between them.
///
/// A relation line is emitted only when a relation field's type names
/// another parsed entity exactly.
pub fn erd_diagram(entities: &[SchemaEntity]) -> String {
    if entities.is_empty() {
        return String::new();
    }

    let mut out = String::from("erDiagram\n");
    for entity in entities {
        let _ = writeln!(out, "    {} {{", erd_token(&entity.name, "entity"));
        for field in &entity.fields {
            let marker = if field.is_primary {
                " PK"
            } else if field.is_relation {
                " FK"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "        {} {}{}",
                erd_token(&field.field_type, "unknown"),
                erd_token(&field.name, "field"),
                marker
            );
        }
        let _ = writeln!(out, "    }}");
    }

    for entity in entities {
        for field in entity.fields.iter().filter(|f| f.is_relation) {
            if let Some(target) = entities.iter().find(|e| e.name == field.field_type) {
                let _ = writeln!(
                    out,
                    "    {} ||--o{{ {} : \"{}\"",
                    erd_token(&entity.name, "entity"),
                    erd_token(&target.name, "entity"),
                    field.name.replace('"', "'")
                );
            }
        }
    }

    out
}
