//! Quote, parenthesis and keyword-adjacency checks

use std::sync::LazyLock;

use regex::Regex;

use super::Report;
use crate::error::{Diagnostic, DiagnosticKind, Span};
use crate::schema::SchemaModel;

static FROM_WHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\s+WHERE\b").expect("valid regex"));
static SELECT_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\s+FROM\b").expect("valid regex"));

pub(super) fn check(query: &str, _schema: Option<&SchemaModel>, report: &mut Report) {
    if query.matches('\'').count() % 2 != 0 {
        report.push(
            Diagnostic::error(
                DiagnosticKind::UnterminatedString,
                "Syntax error: unterminated string literal (odd number of single quotes)",
            )
            .with_help("close the string literal or escape the quote as ''"),
        );
    }

    if query.matches('"').count() % 2 != 0 {
        report.push(Diagnostic::error(
            DiagnosticKind::UnterminatedIdentifier,
            "Syntax error: unterminated identifier (odd number of double quotes)",
        ));
    }

    check_parentheses(query, report);

    if let Some(m) = FROM_WHERE.find(query) {
        report.push(
            Diagnostic::error(
                DiagnosticKind::MissingTableName,
                "Syntax error: missing table name between FROM and WHERE",
            )
            .with_span(m),
        );
    }

    if let Some(m) = SELECT_FROM.find(query) {
        report.push(
            Diagnostic::error(
                DiagnosticKind::MissingColumnList,
                "Syntax error: missing column list between SELECT and FROM",
            )
            .with_span(m),
        );
    }
}

/// Single left-to-right scan; stops at the first closing paren without a match
fn check_parentheses(query: &str, report: &mut Report) {
    let mut depth: usize = 0;
    for (offset, ch) in query.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => {
                report.push(
                    Diagnostic::error(
                        DiagnosticKind::UnbalancedParentheses,
                        format!(
                            "Syntax error: unbalanced parentheses (unexpected ')' at offset {})",
                            offset
                        ),
                    )
                    .with_span(Span::new(offset, 1)),
                );
                return;
            }
            ')' => depth -= 1,
            _ => {}
        }
    }

    if depth > 0 {
        report.push(Diagnostic::error(
            DiagnosticKind::UnclosedParenthesis,
            format!("Syntax error: unclosed parenthesis ({} left open)", depth),
        ));
    }
}
