// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the schema model

use schemalens_ir::{
    Column, Constraint, ConstraintKind, DriverInfo, Relation, Schema, Table, TableKind, diff,
};

fn commerce() -> Schema {
    let mut schema = Schema::new("shop", DriverInfo::new("postgres", "PostgreSQL 16.2"));
    schema.tables = vec![
        Table::new("customers")
            .with_comment("Registered customers")
            .with_columns(vec![
                Column::new("id", "integer").with_default("nextval('customers_id_seq'::regclass)"),
                Column::new("nickname", "text").with_nullable(true).with_default(""),
                Column::new("note", "text").with_nullable(true),
            ]),
        Table::new("orders")
            .with_columns(vec![
                Column::new("id", "integer"),
                Column::new("customer_id", "integer"),
            ])
            .with_constraints(vec![
                Constraint::new(
                    "orders_customer_id_fkey",
                    ConstraintKind::ForeignKey,
                    "FOREIGN KEY (customer_id) REFERENCES customers(id)",
                )
                .with_columns(["customer_id"])
                .with_reference("customers", ["id"]),
            ]),
        Table::new("order_totals").with_kind(TableKind::MaterializedView),
    ];
    schema.relations.push(Relation {
        constraint: "orders_customer_id_fkey".to_string(),
        table: "orders".to_string(),
        columns: vec!["customer_id".to_string()],
        parent_table: "customers".to_string(),
        parent_columns: vec!["id".to_string()],
        definition: "FOREIGN KEY (customer_id) REFERENCES customers(id)".to_string(),
    });
    schema
}

#[test]
fn test_schema_is_valid() {
    assert!(commerce().validate().is_ok());
}

#[test]
fn test_json_serialization_preserves_empty_default() {
    let schema = commerce();
    let json = serde_json::to_string(&schema).unwrap();
    let restored: Schema = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, schema);

    let customers = restored.find_table("customers").unwrap();
    assert_eq!(customers.find_column("nickname").unwrap().default, Some(String::new()));
    assert_eq!(customers.find_column("note").unwrap().default, None);
}

#[test]
fn test_json_shape_for_absent_default() {
    let column = Column::new("note", "text").with_nullable(true);
    let value = serde_json::to_value(&column).unwrap();
    assert!(value["default"].is_null());

    let column = column.with_default("");
    let value = serde_json::to_value(&column).unwrap();
    assert_eq!(value["default"], "");
}

#[test]
fn test_relations_lookup() {
    let schema = commerce();
    assert_eq!(schema.find_relations_for("customers").count(), 1);
    assert_eq!(schema.find_relations_for("orders").count(), 1);
    assert_eq!(schema.find_relations_for("order_totals").count(), 0);
}

#[test]
fn test_diff_of_clones_is_empty() {
    let schema = commerce();
    assert!(diff(&schema, &schema.clone()).is_empty());
}
