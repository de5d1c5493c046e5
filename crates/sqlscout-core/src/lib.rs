//! sqlscout-core: schema-aware SQL query checks
//!
//! This library loads a declared relational schema, answers introspection
//! questions about it (relevant tables, column suggestions, single-hop join
//! paths) and runs heuristic validation passes over raw SQL text without
//! requiring a database connection.

pub mod error;
pub mod join;
pub mod schema;
pub mod search;
pub mod validator;

pub use error::{Diagnostic, DiagnosticKind, SchemaError, Severity, Span};
pub use join::{JoinCondition, JoinResolver, JoinType};
pub use schema::{
    load_schema, ColumnSpec, ForeignKeyRef, SchemaBuilder, SchemaModel, TableDef, TableSummary,
};
pub use search::RelevanceIndex;
pub use validator::{validate, ValidationResult, Validator};
