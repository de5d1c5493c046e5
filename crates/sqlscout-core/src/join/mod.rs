//! Single-hop join discovery from declared foreign keys

use serde::{Deserialize, Serialize};

use crate::schema::SchemaModel;

/// Kind of join produced by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
        }
    }
}

/// Join between two tables over one foreign-key edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub join_type: JoinType,
    /// Table declaring the foreign key
    pub left_table: String,
    /// Table the foreign key points at
    pub right_table: String,
    /// Qualified equality, e.g. `orders.user_id = users.id`
    pub condition: String,
}

impl std::fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} JOIN {} ON {}",
            self.join_type, self.right_table, self.condition
        )
    }
}

/// Resolves join conditions between pairs of tables
///
/// Only direct foreign keys are considered. Tables linked through an
/// intermediate table have no path here.
pub struct JoinResolver<'a> {
    schema: &'a SchemaModel,
}

impl<'a> JoinResolver<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        Self { schema }
    }

    /// Find a join between `a` and `b`, trying `a`'s foreign keys first.
    /// The first matching foreign key in declaration order wins.
    pub fn find_join_path(&self, a: &str, b: &str) -> Option<JoinCondition> {
        let found = self
            .directed(a, b)
            .or_else(|| self.directed(b, a));
        if found.is_none() {
            tracing::debug!(a, b, "no single-hop join path");
        }
        found
    }

    fn directed(&self, from: &str, to: &str) -> Option<JoinCondition> {
        let table = self.schema.table(from)?;
        let (column, fk) = table
            .foreign_keys
            .iter()
            .find(|(_, fk)| fk.targets(to))?;

        Some(JoinCondition {
            join_type: JoinType::Inner,
            left_table: table.name.clone(),
            right_table: fk.table.clone(),
            condition: format!("{}.{} = {}", table.name, column, fk),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    fn setup_schema() -> SchemaModel {
        let mut builder = SchemaBuilder::new();
        builder
            .parse_json(
                r#"{"tables": {
                    "users": {"columns": {"id": {"type": "integer"}}},
                    "orders": {
                        "columns": {
                            "id": {"type": "integer"},
                            "user_id": {"type": "integer"},
                            "approver_id": {"type": "integer"}
                        },
                        "foreign_keys": {"user_id": "users.id", "approver_id": "users.id"}
                    },
                    "order_items": {
                        "columns": {"order_id": {"type": "integer"}},
                        "foreign_keys": {"order_id": "orders.id"}
                    }
                }}"#,
            )
            .unwrap();
        builder.build().0
    }

    #[test]
    fn test_direction_follows_declaration() {
        let schema = setup_schema();
        let resolver = JoinResolver::new(&schema);

        let expected = JoinCondition {
            join_type: JoinType::Inner,
            left_table: "orders".to_string(),
            right_table: "users".to_string(),
            condition: "orders.user_id = users.id".to_string(),
        };
        assert_eq!(resolver.find_join_path("orders", "users"), Some(expected.clone()));
        assert_eq!(resolver.find_join_path("users", "orders"), Some(expected));
    }

    #[test]
    fn test_first_foreign_key_wins() {
        let schema = setup_schema();
        let resolver = JoinResolver::new(&schema);

        let join = resolver.find_join_path("users", "orders").unwrap();
        assert!(!join.condition.contains("approver_id"));
    }

    #[test]
    fn test_no_multi_hop() {
        let schema = setup_schema();
        let resolver = JoinResolver::new(&schema);

        assert!(resolver.find_join_path("order_items", "users").is_none());
        assert!(resolver.find_join_path("users", "missing").is_none());
    }

    #[test]
    fn test_display() {
        let schema = setup_schema();
        let resolver = JoinResolver::new(&schema);

        let join = resolver.find_join_path("order_items", "orders").unwrap();
        assert_eq!(
            join.to_string(),
            "INNER JOIN orders ON order_items.order_id = orders.id"
        );
    }
}
