//! Table and column references checked against the schema

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use super::{qualified_refs, select_clause, Report};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::schema::SchemaModel;

static TABLE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:FROM|JOIN)\s+(\w+)").expect("valid regex"));

pub(super) fn check(query: &str, schema: Option<&SchemaModel>, report: &mut Report) {
    let Some(schema) = schema else {
        report.push(Diagnostic::warning(
            DiagnosticKind::NoSchema,
            "No schema loaded; table and column references were not checked",
        ));
        return;
    };

    // Each distinct name is checked once, at its first occurrence
    let mut seen = IndexSet::new();
    for caps in TABLE_REF.captures_iter(query) {
        let Some(name) = caps.get(1) else { continue };
        if !seen.insert(name.as_str()) {
            continue;
        }
        if !schema.has_table(name.as_str()) {
            report.push(
                Diagnostic::error(
                    DiagnosticKind::TableNotFound,
                    format!("Table '{}' not found in schema", name.as_str()),
                )
                .with_span(name),
            );
        }
    }

    // Only `table.column` in the SELECT list; bare columns are left alone
    let Some(clause) = select_clause(query) else {
        return;
    };
    if clause.as_str().trim() == "*" {
        return;
    }
    for (table_name, column) in qualified_refs(clause.as_str()) {
        let Some(table) = schema.table(table_name) else {
            continue;
        };
        if !table.column_exists(column) {
            report.push(Diagnostic::error(
                DiagnosticKind::ColumnNotFound,
                format!(
                    "Column '{}' not found in table '{}'",
                    column, table_name
                ),
            ));
        }
    }
}
