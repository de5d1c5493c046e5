//! Query validation pipeline
//!
//! A validation run is a fixed sequence of independent passes over the raw
//! query text. Each pass appends to the `Report` it is handed; none of them
//! can stop the pipeline. The checks are lexical heuristics driven by regular
//! expressions, not a SQL parser: unqualified columns, subqueries and aliases
//! are never resolved.

mod grouping;
mod joins;
mod references;
mod safety;
mod syntax;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::schema::SchemaModel;

type Pass = fn(&str, Option<&SchemaModel>, &mut Report);

/// Passes in execution order; the output order of diagnostics follows it
const PASSES: [(&str, Pass); 5] = [
    ("syntax", syntax::check),
    ("references", references::check),
    ("grouping", grouping::check),
    ("joins", joins::check),
    ("safety", safety::check),
];

/// Verdict for a single query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(rename = "valid")]
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Partition diagnostics by severity, keeping their order
    pub fn from_diagnostics<'d>(diagnostics: impl IntoIterator<Item = &'d Diagnostic>) -> Self {
        let mut result = Self::default();
        for diag in diagnostics {
            if diag.is_error() {
                result.errors.push(diag.message.clone());
            } else {
                result.warnings.push(diag.message.clone());
            }
        }
        result.is_valid = result.errors.is_empty();
        result
    }
}

/// Diagnostics accumulated across the passes of one validation run
#[derive(Debug, Default)]
pub(crate) struct Report {
    diagnostics: Vec<Diagnostic>,
    /// Leading whitespace stripped from the query; spans are shifted by it
    base_offset: usize,
}

impl Report {
    fn new(base_offset: usize) -> Self {
        Self {
            diagnostics: Vec::new(),
            base_offset,
        }
    }

    /// Record a diagnostic whose span, if any, is relative to the trimmed query
    pub(crate) fn push(&mut self, mut diag: Diagnostic) {
        diag.span = diag.span.map(|span| span.shifted(self.base_offset));
        self.diagnostics.push(diag);
    }

    fn len(&self) -> usize {
        self.diagnostics.len()
    }

    fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// SQL validator - runs every pass against a query
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator<'a> {
    schema: Option<&'a SchemaModel>,
}

impl<'a> Validator<'a> {
    /// Create a validator; without a schema only schema-independent checks run
    pub fn new(schema: Option<&'a SchemaModel>) -> Self {
        Self { schema }
    }

    /// Validate a query and return the verdict
    pub fn validate(&self, sql: &str) -> ValidationResult {
        ValidationResult::from_diagnostics(&self.check(sql))
    }

    /// Run all passes and return the raw diagnostics in pass order
    pub fn check(&self, sql: &str) -> Vec<Diagnostic> {
        let query = sql.trim();
        let base_offset = sql.len() - sql.trim_start().len();
        let mut report = Report::new(base_offset);

        for (name, pass) in PASSES {
            let before = report.len();
            pass(query, self.schema, &mut report);
            tracing::debug!(
                pass = name,
                found = report.len() - before,
                "validation pass finished"
            );
        }

        report.into_diagnostics()
    }
}

/// Validate `sql`, optionally against a schema
pub fn validate(sql: &str, schema: Option<&SchemaModel>) -> ValidationResult {
    Validator::new(schema).validate(sql)
}

static SELECT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b").expect("valid regex"));

static QUALIFIED_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\.(\w+)").expect("valid regex"));

/// Text between the first SELECT and the following FROM
pub(crate) fn select_clause(query: &str) -> Option<regex::Match<'_>> {
    SELECT_CLAUSE.captures(query).and_then(|caps| caps.get(1))
}

/// `(table, column)` pairs written as `ident.ident`
pub(crate) fn qualified_refs(text: &str) -> impl Iterator<Item = (&str, &str)> {
    QUALIFIED_REF.captures_iter(text).filter_map(|caps| {
        let table = caps.get(1)?.as_str();
        let column = caps.get(2)?.as_str();
        Some((table, column))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DiagnosticKind, Severity};

    #[test]
    fn test_select_clause() {
        let clause = select_clause("SELECT a, b\nFROM t").unwrap();
        assert_eq!(clause.as_str(), "a, b");
        assert_eq!(select_clause("select *  from t").unwrap().as_str(), "*");
        assert!(select_clause("SELECT FROM t").is_none());
        assert!(select_clause("DELETE FROM t").is_none());
    }

    #[test]
    fn test_qualified_refs() {
        let refs: Vec<_> = qualified_refs("u.id, orders.total, name").collect();
        assert_eq!(refs, vec![("u", "id"), ("orders", "total")]);
    }

    #[test]
    fn test_result_partitions_by_severity() {
        let diags = vec![
            Diagnostic::warning(DiagnosticKind::UnboundedSelect, "w1"),
            Diagnostic::error(DiagnosticKind::TableNotFound, "e1"),
            Diagnostic::warning(DiagnosticKind::NoSchema, "w2"),
        ];
        let result = ValidationResult::from_diagnostics(&diags);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["e1"]);
        assert_eq!(result.warnings, vec!["w1", "w2"]);

        let result = ValidationResult::from_diagnostics(diags.iter().filter(|d| !d.is_error()));
        assert!(result.is_valid);
    }

    #[test]
    fn test_spans_point_into_untrimmed_query() {
        let sql = "   SELECT * FROM t WHERE (a = 1))";
        let diags = Validator::new(None).check(sql);
        let unbalanced = diags
            .iter()
            .find(|d| d.kind == DiagnosticKind::UnbalancedParentheses)
            .unwrap();
        assert_eq!(unbalanced.severity, Severity::Error);
        let span = unbalanced.span.unwrap();
        assert_eq!(&sql[span.offset..span.offset + span.length], ")");
        assert_eq!(span.offset, sql.len() - 1);
    }
}
