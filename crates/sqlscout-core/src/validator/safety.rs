//! Unfiltered mutations, unbounded reads and injection signatures

use std::sync::LazyLock;

use regex::Regex;

use super::Report;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::schema::SchemaModel;

static MUTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:DELETE|UPDATE)\b").expect("valid regex"));
static WHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWHERE\b").expect("valid regex"));
static SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\b").expect("valid regex"));
static LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLIMIT\b").expect("valid regex"));

// Injection signatures; anything else slips through
static STACKED_DROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i);\s*DROP\b").expect("valid regex"));
static TRAILING_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--\s*$").expect("valid regex"));
static TAUTOLOGY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)'\s*OR\s+'1'\s*=\s*'1").expect("valid regex"));

pub(super) fn check(query: &str, _schema: Option<&SchemaModel>, report: &mut Report) {
    if let Some(keyword) = MUTATION.find(query) {
        if !WHERE.is_match(query) {
            report.push(
                Diagnostic::error(
                    DiagnosticKind::UnfilteredMutation,
                    format!(
                        "Dangerous operation: {} without WHERE clause affects every row",
                        keyword.as_str().to_uppercase()
                    ),
                )
                .with_span(keyword),
            );
        }
    }

    if SELECT.is_match(query) && !LIMIT.is_match(query) {
        report.push(Diagnostic::warning(
            DiagnosticKind::UnboundedSelect,
            "SELECT without LIMIT may return an unbounded number of rows; consider adding LIMIT",
        ));
    }

    let signatures = [
        (
            &STACKED_DROP,
            DiagnosticKind::InjectedDrop,
            "Possible SQL injection: statement terminator followed by DROP",
        ),
        (
            &TRAILING_COMMENT,
            DiagnosticKind::InjectedComment,
            "Possible SQL injection: trailing '--' comment marker",
        ),
        (
            &TAUTOLOGY,
            DiagnosticKind::InjectedTautology,
            "Possible SQL injection: 'OR '1'='1 tautology",
        ),
    ];
    for (pattern, kind, message) in signatures {
        if let Some(m) = pattern.find(query) {
            report.push(Diagnostic::error(kind, message).with_span(m));
        }
    }
}
