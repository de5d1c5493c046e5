//! JOIN conditions: missing ON and unqualified operands

use std::sync::LazyLock;

use regex::Regex;

use super::{qualified_refs, Report};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::schema::SchemaModel;

/// `JOIN <table> [[AS] <alias>]` plus the word that follows
static JOIN_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bJOIN\s+(\w+)(?:\s+AS\b)?(?:\s+(\w+))?(?:\s+(\w+))?").expect("valid regex")
});
static JOIN_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bJOIN\b").expect("valid regex"));
static CONDITION_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\b(?:WHERE|ON)\s+(.*?)(?:\bGROUP\b|\bORDER\b|\bLIMIT\b|$)")
        .expect("valid regex")
});
static COMPARISON_OPERAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\s*(?:=|!=|<>|<=|>=|<|>)").expect("valid regex"));

pub(super) fn check(query: &str, _schema: Option<&SchemaModel>, report: &mut Report) {
    if let Some(join) = JOIN_TARGET.captures_iter(query).find(|caps| !has_on(caps)) {
        let mut diag = Diagnostic::warning(
            DiagnosticKind::PossibleCrossJoin,
            "JOIN without ON condition may produce an unintended cross join",
        )
        .with_help("add an ON clause relating the joined tables");
        if let Some(m) = join.get(0) {
            diag = diag.with_span(m);
        }
        report.push(diag);
    }

    if !JOIN_KEYWORD.is_match(query) {
        return;
    }
    for caps in CONDITION_BODY.captures_iter(query) {
        let Some(body) = caps.get(1) else { continue };
        let body = body.as_str();
        if qualified_refs(body).next().is_none() && COMPARISON_OPERAND.is_match(body) {
            report.push(Diagnostic::warning(
                DiagnosticKind::UnqualifiedJoinColumn,
                "Unqualified column in a JOIN query; use table aliases (e.g. u.id) to avoid ambiguity",
            ));
            break;
        }
    }
}

/// True when the word after the table (or after its alias) is ON
fn has_on(caps: &regex::Captures<'_>) -> bool {
    let is_on = |idx| caps.get(idx).is_some_and(|m| m.as_str().eq_ignore_ascii_case("ON"));
    is_on(2) || (caps.get(2).is_some() && is_on(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(query: &str) -> Vec<DiagnosticKind> {
        let mut report = Report::new(0);
        check(query, None, &mut report);
        report.into_diagnostics().into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_join_with_on() {
        assert!(kinds("SELECT * FROM users u JOIN orders o ON o.user_id = u.id").is_empty());
        assert!(kinds("SELECT * FROM users JOIN orders ON orders.user_id = users.id").is_empty());
        assert!(kinds("SELECT * FROM users u JOIN orders AS o ON o.user_id = u.id").is_empty());
    }

    #[test]
    fn test_join_without_on_warns_once() {
        assert_eq!(
            kinds("SELECT name FROM users JOIN orders"),
            vec![DiagnosticKind::PossibleCrossJoin]
        );
        assert_eq!(
            kinds("SELECT * FROM a JOIN b x JOIN c y WHERE x.id = y.id"),
            vec![DiagnosticKind::PossibleCrossJoin]
        );
    }

    #[test]
    fn test_unqualified_operands() {
        assert_eq!(
            kinds("SELECT * FROM users JOIN orders ON user_id = id"),
            vec![DiagnosticKind::UnqualifiedJoinColumn]
        );
        // One qualified reference anywhere in the body is enough
        assert!(kinds("SELECT * FROM users u JOIN orders o ON o.user_id = id").is_empty());
        // Without a JOIN the WHERE clause is not inspected
        assert!(kinds("SELECT * FROM users WHERE id = 1").is_empty());
    }
}
