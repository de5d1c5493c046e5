//! Schema builder - converts a JSON schema document to a SchemaModel

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Diagnostic, DiagnosticKind, SchemaError};
use crate::schema::{ColumnSpec, ForeignKeyRef, SchemaModel, TableDef};

/// Raw schema document as written on disk
///
/// Every field is optional so partially specified schemas still load.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub tables: IndexMap<String, TableDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TableDocument {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub columns: IndexMap<String, ColumnDocument>,
    #[serde(default)]
    pub foreign_keys: IndexMap<String, String>,
}

/// A column is either a `{"type": ..., "nullable": ...}` object or a bare type string
///
/// `null` for either field falls back to the default (empty type, nullable).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ColumnDocument {
    Detailed {
        #[serde(rename = "type", default)]
        data_type: Option<String>,
        #[serde(default)]
        nullable: Option<bool>,
    },
    TypeOnly(String),
}

impl ColumnDocument {
    fn into_spec(self) -> ColumnSpec {
        match self {
            ColumnDocument::Detailed {
                data_type,
                nullable,
            } => ColumnSpec {
                data_type: data_type.unwrap_or_default(),
                nullable: nullable.unwrap_or(true),
            },
            ColumnDocument::TypeOnly(data_type) => ColumnSpec::new(data_type),
        }
    }
}

/// Builder for constructing a SchemaModel from schema documents
pub struct SchemaBuilder {
    model: SchemaModel,
    diagnostics: Vec<Diagnostic>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            model: SchemaModel::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse a JSON schema document and add its tables
    pub fn parse_json(&mut self, json: &str) -> Result<(), SchemaError> {
        let document: SchemaDocument =
            serde_json::from_str(json).map_err(|source| SchemaError::Parse { source })?;
        self.add_document(document);
        Ok(())
    }

    /// Add every table of an already deserialized document
    pub fn add_document(&mut self, document: SchemaDocument) {
        for (name, table) in document.tables {
            self.process_table(name, table);
        }
    }

    fn process_table(&mut self, name: String, doc: TableDocument) {
        let mut table = TableDef::new(name);
        table.description = doc.description;

        for (col_name, col) in doc.columns {
            table.columns.insert(col_name, col.into_spec());
        }

        if let Some(pk) = doc.primary_key {
            if !table.columns.contains_key(&pk) {
                self.warn(
                    DiagnosticKind::UndeclaredKeyColumn,
                    format!(
                        "Primary key '{}' of table '{}' is not a declared column",
                        pk, table.name
                    ),
                );
            }
            table.primary_key = Some(pk);
        }

        for (column, reference) in doc.foreign_keys {
            let Some(fk) = ForeignKeyRef::parse(&reference) else {
                self.warn(
                    DiagnosticKind::MalformedForeignKey,
                    format!(
                        "Foreign key '{}.{}' has malformed reference '{}' (expected table.column)",
                        table.name, column, reference
                    ),
                );
                continue;
            };
            if !table.columns.contains_key(&column) {
                self.warn(
                    DiagnosticKind::UndeclaredKeyColumn,
                    format!(
                        "Foreign key column '{}' of table '{}' is not a declared column",
                        column, table.name
                    ),
                );
            }
            table.foreign_keys.insert(column, fk);
        }

        tracing::debug!(
            table = %table.name,
            columns = table.columns.len(),
            foreign_keys = table.foreign_keys.len(),
            "loaded table"
        );
        self.model.add_table(table);
    }

    /// Finish building and return the model with any data-quality diagnostics
    pub fn build(mut self) -> (SchemaModel, Vec<Diagnostic>) {
        self.check_references();
        (self.model, self.diagnostics)
    }

    /// Flag foreign keys whose target is absent; they stay in the model
    fn check_references(&mut self) {
        let mut dangling = Vec::new();
        for table in self.model.tables.values() {
            for (column, fk) in &table.foreign_keys {
                let message = match self.model.table(&fk.table) {
                    None => format!(
                        "Foreign key '{}.{}' references unknown table '{}'",
                        table.name, column, fk.table
                    ),
                    Some(target) if !target.column_exists(&fk.column) => format!(
                        "Foreign key '{}.{}' references unknown column '{}'",
                        table.name, column, fk
                    ),
                    Some(_) => continue,
                };
                dangling.push(message);
            }
        }
        for message in dangling {
            self.warn(DiagnosticKind::DanglingForeignKey, message);
        }
    }

    fn warn(&mut self, kind: DiagnosticKind, message: String) {
        tracing::warn!(code = kind.code(), "{}", message);
        self.diagnostics.push(Diagnostic::warning(kind, message));
    }
}

/// Load a schema model from a JSON file on disk
pub fn load_schema(path: impl AsRef<Path>) -> Result<(SchemaModel, Vec<Diagnostic>), SchemaError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SchemaError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut builder = SchemaBuilder::new();
    builder.parse_json(&content)?;
    Ok(builder.build())
}
