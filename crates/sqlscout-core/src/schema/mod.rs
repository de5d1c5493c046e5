//! Schema management module

mod builder;
mod model;

pub use builder::{load_schema, ColumnDocument, SchemaBuilder, SchemaDocument, TableDocument};
pub use model::{ColumnSpec, ForeignKeyRef, SchemaModel, TableDef, TableSummary};
