//! Schema model - stores table and column definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema model - holds all table information for an analysis session
///
/// Built once by [`SchemaBuilder`](super::SchemaBuilder) and read-only afterwards.
/// Table keys keep their declared spelling; every lookup is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Table name -> TableDef
    pub tables: IndexMap<String, TableDef>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all table names in declaration order
    pub fn tables(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        // Exact hit first, then case-insensitive scan
        self.tables.get(name).or_else(|| {
            self.tables
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Columns of a table in declaration order; empty if the table is unknown
    pub fn columns(&self, table: &str) -> IndexMap<&str, &ColumnSpec> {
        self.table(table)
            .map(|t| t.columns.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    /// Primary key column of a table, if declared
    pub fn primary_key(&self, table: &str) -> Option<&str> {
        self.table(table).and_then(|t| t.primary_key.as_deref())
    }

    /// Foreign keys of a table (column -> reference); empty if the table is unknown
    pub fn foreign_keys(&self, table: &str) -> IndexMap<&str, &ForeignKeyRef> {
        self.table(table)
            .map(|t| t.foreign_keys.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    /// One-line-per-table overview, sorted by table name
    pub fn summary(&self) -> Vec<TableSummary> {
        let mut summary: Vec<TableSummary> = self.tables.values().map(TableSummary::from).collect();
        summary.sort_by(|a, b| a.name.cmp(&b.name));
        summary
    }

    pub(crate) fn add_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub description: Option<String>,
    pub columns: IndexMap<String, ColumnSpec>,
    pub primary_key: Option<String>,
    pub foreign_keys: IndexMap<String, ForeignKeyRef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            columns: IndexMap::new(),
            primary_key: None,
            foreign_keys: IndexMap::new(),
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        // Case-insensitive lookup
        self.columns
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Check if a column exists
    pub fn column_exists(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|s| s.as_str()).collect()
    }
}

/// Condensed view of a table: keys and column names only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub primary_key: Option<String>,
    /// Rendered as `column -> table.column`
    pub foreign_keys: Vec<String>,
    pub columns: Vec<String>,
}

impl From<&TableDef> for TableSummary {
    fn from(table: &TableDef) -> Self {
        Self {
            name: table.name.clone(),
            primary_key: table.primary_key.clone(),
            foreign_keys: table
                .foreign_keys
                .iter()
                .map(|(column, fk)| format!("{} -> {}", column, fk))
                .collect(),
            columns: table.columns.keys().cloned().collect(),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Declared type, free-form (e.g. "varchar(255)", "timestamp")
    pub data_type: String,
    pub nullable: bool,
}

impl ColumnSpec {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Target of a foreign key, split from a `table.column` reference string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

impl ForeignKeyRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse a `table.column` reference, splitting on the first dot
    pub fn parse(reference: &str) -> Option<Self> {
        let (table, column) = reference.split_once('.')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self::new(table, column))
    }

    /// Whether this reference points at `table` (case-insensitive)
    pub fn targets(&self, table: &str) -> bool {
        self.table.eq_ignore_ascii_case(table)
    }
}

impl std::fmt::Display for ForeignKeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SchemaModel {
        let mut users = TableDef::new("Users");
        users
            .columns
            .insert("id".to_string(), ColumnSpec::new("integer").not_null());
        users.primary_key = Some("id".to_string());

        let mut orders = TableDef::new("orders");
        orders
            .columns
            .insert("user_id".to_string(), ColumnSpec::new("integer"));
        orders.foreign_keys.insert(
            "user_id".to_string(),
            ForeignKeyRef::new("Users", "id"),
        );

        let mut model = SchemaModel::new();
        model.add_table(users);
        model.add_table(orders);
        model
    }

    #[test]
    fn test_foreign_key_ref_parse() {
        let fk = ForeignKeyRef::parse("users.id").unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.column, "id");

        // Only the first dot separates table from column
        let fk = ForeignKeyRef::parse("events.payload.id").unwrap();
        assert_eq!(fk.table, "events");
        assert_eq!(fk.column, "payload.id");
        assert_eq!(fk.to_string(), "events.payload.id");

        assert!(ForeignKeyRef::parse("users").is_none());
        assert!(ForeignKeyRef::parse(".id").is_none());
        assert!(ForeignKeyRef::parse("users.").is_none());
    }

    #[test]
    fn test_lookups_are_case_insensitive() {
        let model = sample();
        assert!(model.has_table("users"));
        assert!(model.has_table("USERS"));
        assert_eq!(model.primary_key("users"), Some("id"));
        assert!(model.table("users").unwrap().column_exists("ID"));
    }

    #[test]
    fn test_unknown_table_yields_empty_answers() {
        let model = sample();
        assert!(model.columns("missing").is_empty());
        assert!(model.foreign_keys("missing").is_empty());
        assert_eq!(model.primary_key("missing"), None);
        assert_eq!(model.primary_key("orders"), None);
    }

    #[test]
    fn test_summary_is_sorted_by_name() {
        let mut model = sample();
        model.add_table(TableDef::new("audit"));

        let summary = model.summary();
        let names: Vec<_> = summary.iter().map(|t| t.name.as_str()).collect();
        // Byte order: uppercase sorts first
        assert_eq!(names, vec!["Users", "audit", "orders"]);

        assert_eq!(summary[0].primary_key.as_deref(), Some("id"));
        assert_eq!(summary[0].columns, vec!["id"]);
        assert!(summary[1].foreign_keys.is_empty());
        assert!(summary[1].columns.is_empty());
        assert_eq!(summary[2].primary_key, None);
        assert_eq!(summary[2].foreign_keys, vec!["user_id -> Users.id"]);
    }

    #[test]
    fn test_foreign_keys_keep_declaration_order() {
        let model = sample();
        let fks = model.foreign_keys("orders");
        assert_eq!(fks.len(), 1);
        assert_eq!(fks["user_id"].to_string(), "Users.id");
        assert!(fks["user_id"].targets("users"));
    }
}
