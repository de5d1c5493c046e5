//! Error and diagnostic types

use std::path::PathBuf;

use miette::SourceSpan;
use serde::{Deserialize, Serialize};

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset from start of the query text
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Shift the span by `base` bytes (used to map trimmed offsets back)
    pub fn shifted(self, base: usize) -> Self {
        Self {
            offset: self.offset + base,
            length: self.length,
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.offset.into(), span.length)
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Span::new(m.start(), m.len())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic message produced by schema building or query validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    pub fn with_span(mut self, span: impl Into<Span>) -> Self {
        self.span = Some(span.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Get the diagnostic code string (e.g., "E0001")
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Types of diagnostics
///
/// Codes are stable: new kinds get new codes, existing ones are never reused.
/// `E` codes are always errors and `W` codes are always warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// E0001: Table not found
    TableNotFound,
    /// E0002: Column not found
    ColumnNotFound,
    /// E0003: Odd number of single quotes
    UnterminatedString,
    /// E0004: Odd number of double quotes
    UnterminatedIdentifier,
    /// E0005: Closing parenthesis without an opening one
    UnbalancedParentheses,
    /// E0006: Opening parenthesis never closed
    UnclosedParenthesis,
    /// E0007: FROM directly followed by WHERE
    MissingTableName,
    /// E0008: SELECT directly followed by FROM
    MissingColumnList,
    /// E0009: DELETE or UPDATE without WHERE
    UnfilteredMutation,
    /// E0010: Statement terminator followed by DROP
    InjectedDrop,
    /// E0011: Query ends in a `--` comment marker
    InjectedComment,
    /// E0012: 'OR '1'='1 tautology
    InjectedTautology,
    /// W0001: No schema available for reference checks
    NoSchema,
    /// W0002: Aggregate with qualified columns but no GROUP BY
    MissingGroupBy,
    /// W0003: GROUP BY expression absent from the SELECT list
    GroupByNotSelected,
    /// W0004: JOIN without ON
    PossibleCrossJoin,
    /// W0005: Unqualified comparison operand in a JOIN query
    UnqualifiedJoinColumn,
    /// W0006: SELECT without LIMIT
    UnboundedSelect,
    /// W0007: Foreign key references a missing table or column
    DanglingForeignKey,
    /// W0008: Foreign key reference without a `table.column` shape
    MalformedForeignKey,
    /// W0009: Key declared on a column the table does not have
    UndeclaredKeyColumn,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::TableNotFound => "E0001",
            DiagnosticKind::ColumnNotFound => "E0002",
            DiagnosticKind::UnterminatedString => "E0003",
            DiagnosticKind::UnterminatedIdentifier => "E0004",
            DiagnosticKind::UnbalancedParentheses => "E0005",
            DiagnosticKind::UnclosedParenthesis => "E0006",
            DiagnosticKind::MissingTableName => "E0007",
            DiagnosticKind::MissingColumnList => "E0008",
            DiagnosticKind::UnfilteredMutation => "E0009",
            DiagnosticKind::InjectedDrop => "E0010",
            DiagnosticKind::InjectedComment => "E0011",
            DiagnosticKind::InjectedTautology => "E0012",
            DiagnosticKind::NoSchema => "W0001",
            DiagnosticKind::MissingGroupBy => "W0002",
            DiagnosticKind::GroupByNotSelected => "W0003",
            DiagnosticKind::PossibleCrossJoin => "W0004",
            DiagnosticKind::UnqualifiedJoinColumn => "W0005",
            DiagnosticKind::UnboundedSelect => "W0006",
            DiagnosticKind::DanglingForeignKey => "W0007",
            DiagnosticKind::MalformedForeignKey => "W0008",
            DiagnosticKind::UndeclaredKeyColumn => "W0009",
        }
    }

    /// Severity implied by the code prefix
    pub fn severity(&self) -> Severity {
        if self.code().starts_with('W') {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::TableNotFound => "table-not-found",
            DiagnosticKind::ColumnNotFound => "column-not-found",
            DiagnosticKind::UnterminatedString => "unterminated-string",
            DiagnosticKind::UnterminatedIdentifier => "unterminated-identifier",
            DiagnosticKind::UnbalancedParentheses => "unbalanced-parentheses",
            DiagnosticKind::UnclosedParenthesis => "unclosed-parenthesis",
            DiagnosticKind::MissingTableName => "missing-table-name",
            DiagnosticKind::MissingColumnList => "missing-column-list",
            DiagnosticKind::NoSchema => "no-schema",
            DiagnosticKind::MissingGroupBy => "missing-group-by",
            DiagnosticKind::GroupByNotSelected => "group-by-not-selected",
            DiagnosticKind::PossibleCrossJoin => "possible-cross-join",
            DiagnosticKind::UnqualifiedJoinColumn => "unqualified-join-column",
            DiagnosticKind::UnfilteredMutation => "unfiltered-mutation",
            DiagnosticKind::UnboundedSelect => "unbounded-select",
            DiagnosticKind::InjectedDrop => "injected-drop",
            DiagnosticKind::InjectedComment => "injected-comment",
            DiagnosticKind::InjectedTautology => "injected-tautology",
            DiagnosticKind::DanglingForeignKey => "dangling-foreign-key",
            DiagnosticKind::MalformedForeignKey => "malformed-foreign-key",
            DiagnosticKind::UndeclaredKeyColumn => "undeclared-key-column",
        }
    }
}

/// Failure to construct a schema model from a document
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SchemaError {
    #[error("schema file not found: {}", path.display())]
    #[diagnostic(
        code(sqlscout::schema::not_found),
        help("pass an existing JSON schema file with --schema")
    )]
    NotFound { path: PathBuf },

    #[error("failed to read schema file {}", path.display())]
    #[diagnostic(code(sqlscout::schema::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema document: {source}")]
    #[diagnostic(
        code(sqlscout::schema::parse),
        help("expected a JSON object with a `tables` mapping")
    )]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}
