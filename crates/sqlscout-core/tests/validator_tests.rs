// Integration tests for the validation pipeline
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use sqlscout_core::error::DiagnosticKind;
use sqlscout_core::schema::{load_schema, SchemaModel};
use sqlscout_core::validator::{validate, Validator};

fn setup_schema() -> SchemaModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.json");
    let (schema, _) = load_schema(path).unwrap();
    schema
}

fn kinds(sql: &str, schema: Option<&SchemaModel>) -> Vec<DiagnosticKind> {
    Validator::new(schema)
        .check(sql)
        .into_iter()
        .map(|d| d.kind)
        .collect()
}

#[test]
fn test_select_star_warns_about_limit() {
    let schema = setup_schema();
    let result = validate("SELECT * FROM users", Some(&schema));

    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("LIMIT"));
}

#[test]
fn test_delete_without_where_is_an_error() {
    let schema = setup_schema();
    let result = validate("DELETE FROM users", Some(&schema));

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("DELETE without WHERE"));
}

#[test]
fn test_join_without_on_is_only_a_warning() {
    let schema = setup_schema();
    let result = validate("SELECT name FROM users JOIN orders", Some(&schema));

    assert!(result.is_valid);
    assert!(result.warnings.iter().any(|w| w.contains("cross join")));
}

#[test]
fn test_count_star_needs_no_group_by() {
    let schema = setup_schema();
    let sql = "SELECT COUNT(*) FROM orders o JOIN users u";

    assert_eq!(
        kinds(sql, Some(&schema)),
        vec![DiagnosticKind::PossibleCrossJoin, DiagnosticKind::UnboundedSelect]
    );
    let result = validate(sql, Some(&schema));
    assert!(!result.warnings.iter().any(|w| w.contains("GROUP BY")));
}

#[test]
fn test_qualified_aggregate_suggests_group_by() {
    let schema = setup_schema();
    let sql = "SELECT users.name, COUNT(orders.id) FROM users JOIN orders ON orders.user_id = users.id LIMIT 10";

    assert_eq!(
        kinds(sql, Some(&schema)),
        vec![DiagnosticKind::MissingGroupBy]
    );
}

#[test]
fn test_unterminated_string_literal() {
    let result = validate("SELECT * FROM users WHERE name = 'it's' LIMIT 1", None);

    assert!(!result.is_valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("unterminated string literal")));
}

#[test]
fn test_extra_closing_parenthesis() {
    let result = validate("SELECT (1)) FROM users LIMIT 1", None);

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("unbalanced parentheses"));
}

#[test]
fn test_unknown_table_and_column() {
    let schema = setup_schema();
    let result = validate(
        "SELECT users.nickname FROM users JOIN invoices ON invoices.user_id = users.id LIMIT 5",
        Some(&schema),
    );

    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        vec![
            "Table 'invoices' not found in schema",
            "Column 'nickname' not found in table 'users'",
        ]
    );
}

#[test]
fn test_without_schema_only_warns() {
    let result = validate("SELECT * FROM anything LIMIT 5", None);

    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("No schema loaded"));
}

#[test]
fn test_output_follows_pass_order() {
    let schema = setup_schema();
    let sql = "DELETE FROM ghosts; DROP TABLE users";

    assert_eq!(
        kinds(sql, Some(&schema)),
        vec![DiagnosticKind::TableNotFound, DiagnosticKind::UnfilteredMutation, DiagnosticKind::InjectedDrop]
    );
}

#[test]
fn test_a_failing_pass_does_not_stop_later_passes() {
    let sql = "SELECT (name FROM users JOIN orders WHERE id = 1";

    assert_eq!(
        kinds(sql, None),
        vec![
            DiagnosticKind::UnclosedParenthesis,
            DiagnosticKind::NoSchema,
            DiagnosticKind::PossibleCrossJoin,
            DiagnosticKind::UnqualifiedJoinColumn,
            DiagnosticKind::UnboundedSelect,
        ]
    );
}

#[test]
fn test_query_is_trimmed() {
    let schema = setup_schema();
    assert_eq!(
        validate("\n   SELECT id FROM users LIMIT 1  \n", Some(&schema)),
        validate("SELECT id FROM users LIMIT 1", Some(&schema))
    );
}

#[test]
fn test_comment_marker_mid_query_is_valid() {
    let result = validate("SELECT * FROM users WHERE name = 'admin'--\nLIMIT 1", None);
    assert!(result.is_valid, "{:?}", result.errors);

    let result = validate("SELECT * FROM users WHERE name = 'admin' LIMIT 1 --\n", None);
    assert_eq!(
        result.errors,
        vec!["Possible SQL injection: trailing '--' comment marker".to_string()]
    );
}

#[test]
fn test_result_invariants() {
    let schema = setup_schema();
    let queries = [
        "",
        "SELECT * FROM users",
        "DELETE FROM users",
        "UPDATE orders SET status = 'paid'",
        "SELECT name FROM users JOIN orders",
        "SELECT status, COUNT(*) FROM orders GROUP BY status, region",
        "SELECT * FROM users WHERE name = '' OR '1'='1'",
        "SELECT * FROM users WHERE id = 1 --",
        "SELECT FROM WHERE",
        "((",
    ];

    for sql in queries {
        for model in [None, Some(&schema)] {
            let first = validate(sql, model);
            let second = validate(sql, model);
            assert_eq!(first, second, "not idempotent: {}", sql);
            assert_eq!(first.is_valid, first.errors.is_empty(), "{}", sql);
            assert!(
                first.errors.iter().all(|e| !first.warnings.contains(e)),
                "errors and warnings overlap: {}",
                sql
            );
        }
    }
}
