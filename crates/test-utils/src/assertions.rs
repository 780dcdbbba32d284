// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Schema-specific test helpers and custom assertions

use schemalens_ir::{Constraint, ConstraintKind, Relation, Schema, Table};

/// Custom assertion helpers for schema testing
pub struct SchemaAssertions;

impl SchemaAssertions {
    /// Get a table or panic
    pub fn table<'a>(schema: &'a Schema, name: &str) -> &'a Table {
        schema
            .find_table(name)
            .unwrap_or_else(|| panic!("Table '{}' not found in schema '{}'", name, schema.name))
    }

    /// Get a constraint or panic
    pub fn constraint<'a>(table: &'a Table, name: &str) -> &'a Constraint {
        table
            .find_constraint(name)
            .unwrap_or_else(|| panic!("Constraint '{}' not found on table '{}'", name, table.name))
    }

    /// Assert the schema's tables, in order
    pub fn assert_table_names(schema: &Schema, expected: &[&str]) {
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, expected, "Table names mismatch");
    }

    /// Assert a table's columns, in order
    pub fn assert_column_names(table: &Table, expected: &[&str]) {
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, expected, "Column names mismatch for table '{}'", table.name);
    }

    /// Assert a constraint exists with the given kind
    pub fn assert_constraint_kind(table: &Table, name: &str, kind: ConstraintKind) {
        let constraint = Self::constraint(table, name);
        assert_eq!(
            constraint.kind, kind,
            "Constraint '{}' on '{}' has the wrong kind",
            name, table.name
        );
    }

    /// Assert a relation exists and return it
    pub fn assert_relation<'a>(
        schema: &'a Schema,
        table: &str,
        columns: &[&str],
        parent_table: &str,
        parent_columns: &[&str],
    ) -> &'a Relation {
        schema
            .relations
            .iter()
            .find(|r| {
                r.table == table
                    && r.columns == columns
                    && r.parent_table == parent_table
                    && r.parent_columns == parent_columns
            })
            .unwrap_or_else(|| {
                panic!(
                    "No relation {}({}) -> {}({}); relations: {:?}",
                    table,
                    columns.join(", "),
                    parent_table,
                    parent_columns.join(", "),
                    schema.relations
                )
            })
    }

    /// Assert no relation points at `parent_table`
    pub fn assert_no_relation_to(schema: &Schema, parent_table: &str) {
        let found: Vec<&Relation> = schema
            .relations
            .iter()
            .filter(|r| r.parent_table == parent_table)
            .collect();
        assert!(
            found.is_empty(),
            "Expected no relation to '{}', found {:?}",
            parent_table,
            found
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalens_ir::{Column, DriverInfo};

    fn schema() -> Schema {
        let mut schema = Schema::new("shop", DriverInfo::new("test", "1"));
        schema.tables = vec![
            Table::new("customers").with_columns(vec![Column::new("id", "integer")]),
            Table::new("orders")
                .with_columns(vec![
                    Column::new("id", "integer"),
                    Column::new("customer_id", "integer"),
                ])
                .with_constraints(vec![
                    Constraint::new("orders_fk", ConstraintKind::ForeignKey, "FOREIGN KEY (customer_id) REFERENCES customers (id)")
                        .with_columns(["customer_id"])
                        .with_reference("customers", ["id"]),
                ]),
        ];
        schema.relations = vec![Relation {
            constraint: "orders_fk".to_string(),
            table: "orders".to_string(),
            columns: vec!["customer_id".to_string()],
            parent_table: "customers".to_string(),
            parent_columns: vec!["id".to_string()],
            definition: "FOREIGN KEY (customer_id) REFERENCES customers (id)".to_string(),
        }];
        schema
    }

    #[test]
    fn test_assertions_pass() {
        let schema = schema();
        SchemaAssertions::assert_table_names(&schema, &["customers", "orders"]);
        let orders = SchemaAssertions::table(&schema, "orders");
        SchemaAssertions::assert_column_names(orders, &["id", "customer_id"]);
        SchemaAssertions::assert_constraint_kind(orders, "orders_fk", ConstraintKind::ForeignKey);
        SchemaAssertions::assert_relation(&schema, "orders", &["customer_id"], "customers", &["id"]);
        SchemaAssertions::assert_no_relation_to(&schema, "orders");
    }

    #[test]
    #[should_panic(expected = "No relation")]
    fn test_missing_relation_panics() {
        SchemaAssertions::assert_relation(&schema(), "customers", &["id"], "orders", &["id"]);
    }
}
