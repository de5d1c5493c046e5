//! Aggregate and GROUP BY consistency

use std::sync::LazyLock;

use regex::Regex;

use super::{qualified_refs, select_clause, Report};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::schema::SchemaModel;

static AGGREGATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:COUNT|SUM|AVG|MIN|MAX|STRING_AGG)\s*\(").expect("valid regex")
});
static GROUP_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bGROUP\s+BY\b").expect("valid regex"));
static GROUP_BY_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bGROUP\s+BY\s+(.*?)(?:\bORDER\b|\bHAVING\b|\bLIMIT\b|$)")
        .expect("valid regex")
});

pub(super) fn check(query: &str, _schema: Option<&SchemaModel>, report: &mut Report) {
    let select = select_clause(query).map(|m| m.as_str());

    if !GROUP_BY.is_match(query) {
        let Some(aggregate) = AGGREGATE.find(query) else {
            return;
        };
        if select.is_some_and(|select| qualified_refs(select).next().is_some()) {
            report.push(
                Diagnostic::warning(
                    DiagnosticKind::MissingGroupBy,
                    "Aggregate function used without GROUP BY; consider grouping by the non-aggregated columns",
                )
                .with_span(aggregate),
            );
        }
        return;
    }

    // Without a recognizable SELECT list there is nothing to compare against
    let Some(select) = select else {
        return;
    };
    let Some(list) = GROUP_BY_LIST.captures(query).and_then(|caps| caps.get(1)) else {
        return;
    };
    // Plain substring containment: aliases and reordered expressions are not understood
    for column in list.as_str().split(',').map(str::trim) {
        if column.is_empty() || select.contains(column) {
            continue;
        }
        report.push(Diagnostic::warning(
            DiagnosticKind::GroupByNotSelected,
            format!("GROUP BY column '{}' does not appear in SELECT clause", column),
        ));
    }
}
