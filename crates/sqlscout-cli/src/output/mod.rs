//! Output formatting

use serde::Serialize;
use sqlscout_core::{Diagnostic, JoinCondition, Severity, TableDef, TableSummary, ValidationResult};

use crate::args::OutputFormat;

/// Output formatter for validation results of one query source
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print diagnostics in the configured format
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic], source: &str) {
        match self.format {
            OutputFormat::Human => self.print_human(diagnostics, source),
            OutputFormat::Json => self.print_json(diagnostics),
            OutputFormat::Sarif => self.print_sarif(diagnostics),
        }
    }

    fn print_human(&self, diagnostics: &[Diagnostic], source: &str) {
        for diag in diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
            };

            eprintln!("{}[{}]: {}", severity_str, diag.code(), diag.message);

            if let Some(span) = &diag.span {
                let (line, col) = offset_to_line_col(source, span.offset);
                eprintln!("  --> {}:{}:{}", self.file_name, line, col);

                if let Some(source_line) = get_source_line(source, line) {
                    eprintln!("   |");
                    eprintln!("{:>3} | {}", line, source_line);

                    let padding = " ".repeat(col.saturating_sub(1));
                    let remaining = source_line.len().saturating_sub(col - 1);
                    let underline = "^".repeat(span.length.min(remaining).max(1));
                    eprintln!("   | {}{}", padding, underline);
                }
            }

            if let Some(help) = &diag.help {
                eprintln!("   = help: {}", help);
            }

            eprintln!();
        }
    }

    fn print_json(&self, diagnostics: &[Diagnostic]) {
        let result = ValidationResult::from_diagnostics(diagnostics);
        let output = serde_json::json!({
            "file": self.file_name,
            "valid": result.is_valid,
            "errors": result.errors,
            "warnings": result.warnings,
            "diagnostics": diagnostics
        });
        print_pretty(&output);
    }

    fn print_sarif(&self, diagnostics: &[Diagnostic]) {
        let results: Vec<serde_json::Value> = diagnostics
            .iter()
            .map(|d| {
                serde_json::json!({
                    "ruleId": d.code(),
                    "level": match d.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    },
                    "message": {
                        "text": d.message
                    },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": {
                                "uri": self.file_name
                            }
                        }
                    }]
                })
            })
            .collect();

        let sarif = serde_json::json!({
            "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "sqlscout",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                },
                "results": results
            }]
        });

        print_pretty(&sarif);
    }
}

/// Print a join lookup result
pub fn print_join(format: OutputFormat, table_a: &str, table_b: &str, join: Option<&JoinCondition>) {
    match format {
        OutputFormat::Human => match join {
            Some(join) => println!("{}", join),
            None => eprintln!(
                "No direct foreign key between '{}' and '{}'",
                table_a, table_b
            ),
        },
        _ => print_pretty(&join),
    }
}

/// Print a list of names (tables or columns)
pub fn print_names(format: OutputFormat, names: &[String]) {
    match format {
        OutputFormat::Human => {
            for name in names {
                println!("{}", name);
            }
        }
        _ => print_pretty(&names),
    }
}

/// Print the detail view of one table
pub fn print_table_info(format: OutputFormat, table: &TableDef) {
    match format {
        OutputFormat::Human => {
            for line in table_info_lines(table) {
                println!("{}", line);
            }
        }
        _ => print_pretty(table),
    }
}

/// Print the condensed schema overview
pub fn print_summary(format: OutputFormat, summary: &[TableSummary]) {
    match format {
        OutputFormat::Human => {
            for line in summary_lines(summary) {
                println!("{}", line);
            }
        }
        _ => print_pretty(summary),
    }
}

fn table_info_lines(table: &TableDef) -> Vec<String> {
    let mut lines = vec![format!("Table: {}", table.name)];
    if let Some(description) = &table.description {
        lines.push(format!("Description: {}", description));
    }

    lines.push(String::new());
    lines.push("Columns:".to_string());
    for (name, column) in &table.columns {
        let nullable = if column.nullable { "NULL" } else { "NOT NULL" };
        lines.push(format!("  - {}: {} {}", name, column.data_type, nullable));
    }

    if let Some(pk) = &table.primary_key {
        lines.push(String::new());
        lines.push(format!("Primary Key: {}", pk));
    }

    if !table.foreign_keys.is_empty() {
        lines.push(String::new());
        lines.push("Foreign Keys:".to_string());
        for (column, fk) in &table.foreign_keys {
            lines.push(format!("  - {} -> {}", column, fk));
        }
    }
    lines
}

fn summary_lines(summary: &[TableSummary]) -> Vec<String> {
    let mut lines = Vec::new();
    for table in summary {
        lines.push(format!("{}:", table.name));
        lines.push(format!("  PK: {}", table.primary_key.as_deref().unwrap_or("")));
        if !table.foreign_keys.is_empty() {
            lines.push(format!("  FKs: {}", table.foreign_keys.join(", ")));
        }
        lines.push(format!("  Columns: {}", table.columns.join(", ")));
    }
    lines
}

fn print_pretty<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}

/// Convert byte offset to line and column (1-indexed)
fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Get a specific line from source (1-indexed)
fn get_source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}
