//! Keyword search over a schema model

use std::collections::BTreeSet;

use crate::schema::{SchemaModel, TableDef};

/// Finds tables and columns matching free-text hints
///
/// Matching is plain case-insensitive substring containment; there is no
/// tokenization or ranking beyond the sort order of the result.
pub struct RelevanceIndex<'a> {
    schema: &'a SchemaModel,
}

impl<'a> RelevanceIndex<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        Self { schema }
    }

    /// Tables whose name, column names or description contain any keyword.
    /// Sorted ascending, without duplicates.
    pub fn find_relevant_tables<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<String> {
        let keywords = lowercase_all(keywords);

        let matches: BTreeSet<&str> = self
            .schema
            .tables
            .values()
            .filter(|table| table_matches(table, &keywords))
            .map(|table| table.name.as_str())
            .collect();

        tracing::debug!(count = matches.len(), "relevant tables found");
        matches.into_iter().map(String::from).collect()
    }

    /// Columns of `table` worth suggesting for the given context, in declaration order
    pub fn suggest_columns<S: AsRef<str>>(&self, table: &str, context_keywords: &[S]) -> Vec<String> {
        let Some(table) = self.schema.table(table) else {
            return Vec::new();
        };
        let keywords = lowercase_all(context_keywords);
        let wants_temporal = keywords.iter().any(|k| k == "date" || k == "time");
        let wants_text = keywords.iter().any(|k| k == "text");

        table
            .columns
            .iter()
            .filter(|(name, spec)| {
                let data_type = spec.data_type.to_lowercase();
                contains_any(name, &keywords)
                    || (wants_temporal && data_type.contains("timestamp"))
                    || (wants_text && data_type.contains("varchar"))
            })
            .map(|(name, _)| name.clone())
            .collect()
    }
}

fn table_matches(table: &TableDef, keywords: &[String]) -> bool {
    contains_any(&table.name, keywords)
        || table.columns.keys().any(|col| contains_any(col, keywords))
        || table
            .description
            .as_deref()
            .is_some_and(|desc| contains_any(desc, keywords))
}

/// `keywords` must already be lowercase
fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

fn lowercase_all<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords.iter().map(|k| k.as_ref().to_lowercase()).collect()
}
