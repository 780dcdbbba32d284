// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Canned fixture drivers
//!
//! Each fixture returns a [`FixtureDriverBuilder`] so tests can add failures
//! or delays before building.

use schemalens_catalog::{RawColumn, RawConstraint, RawIndex, RawReference};
use schemalens_ir::{ConstraintKind, IdentifierCase, TableKind};

use crate::fixture_driver::{FixtureDriverBuilder, FixtureTable};

const COMPOSITE_KEYS_YAML: &str = include_str!("../fixtures/composite_keys.yaml");

fn primary_key(table: &str, column: &str) -> RawConstraint {
    RawConstraint::new(
        format!("{}_pkey", table),
        ConstraintKind::PrimaryKey,
        format!("PRIMARY KEY ({})", column),
    )
    .with_columns([column])
}

fn primary_index(table: &str, column: &str) -> RawIndex {
    RawIndex {
        name: format!("{}_pkey", table),
        definition: format!(
            "CREATE UNIQUE INDEX {}_pkey ON public.{} USING btree ({})",
            table, table, column
        ),
        columns: vec![column.to_string()],
        unique: true,
        primary: true,
    }
}

/// Canned schemas for testing
pub struct Fixtures;

impl Fixtures {
    /// PostgreSQL-style `shop` schema
    ///
    /// Tables are listed out of name order. `orders` has a text-only foreign
    /// key, `order_items` has structured ones, and `audit_log` references a
    /// table in another schema.
    pub fn commerce() -> FixtureDriverBuilder {
        FixtureDriverBuilder::new()
            .with_info("postgres", "PostgreSQL 16.2 on x86_64-pc-linux-gnu")
            .with_scope("shop")
            .with_identifier_case(IdentifierCase::FoldLower)
            .with_concurrent_fetch(true)
            .with_table(
                FixtureTable::new("orders")
                    .with_column(RawColumn::new("id", "integer").with_default("nextval('orders_id_seq'::regclass)"))
                    .with_column(RawColumn::new("customer_id", "integer"))
                    .with_column(RawColumn::new("total", "numeric(12,2)").with_default("0"))
                    .with_column(RawColumn::new("note", "text").with_nullable(true).with_default("''::text"))
                    .with_column(RawColumn::new("placed_at", "timestamp with time zone").with_default("now()"))
                    .with_index(primary_index("orders", "id"))
                    .with_constraint(
                        RawConstraint::new(
                            "orders_customer_id_fkey",
                            ConstraintKind::ForeignKey,
                            "FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE",
                        )
                        .with_columns(["customer_id"]),
                    )
                    .with_constraint(primary_key("orders", "id"))
                    .with_constraint(
                        RawConstraint::new(
                            "orders_total_check",
                            ConstraintKind::Check,
                            "CHECK (total >= 0::numeric)",
                        )
                        .with_columns(["total"]),
                    ),
            )
            .with_table(
                FixtureTable::new("customers")
                    .with_comment("People who place orders")
                    .with_column(RawColumn::new("id", "integer"))
                    .with_column(RawColumn::new("email", "character varying(255)").with_comment("Login address"))
                    .with_column(RawColumn::new("name", "text").with_nullable(true))
                    .with_index(primary_index("customers", "id"))
                    .with_constraint(primary_key("customers", "id"))
                    .with_constraint(
                        RawConstraint::new(
                            "customers_email_key",
                            ConstraintKind::Unique,
                            "UNIQUE (email)",
                        )
                        .with_columns(["email"]),
                    ),
            )
            .with_table(
                FixtureTable::new("products")
                    .with_column(RawColumn::new("id", "integer"))
                    .with_column(RawColumn::new("sku", "text"))
                    .with_column(RawColumn::new("price", "numeric(10,2)"))
                    .with_constraint(
                        RawConstraint::new("products_price_check", ConstraintKind::Check, "CHECK (price > 0)")
                            .with_columns(["price"]),
                    )
                    .with_constraint(primary_key("products", "id")),
            )
            .with_table(
                FixtureTable::new("order_items")
                    .with_column(RawColumn::new("order_id", "integer"))
                    .with_column(RawColumn::new("product_id", "integer"))
                    .with_column(RawColumn::new("quantity", "integer").with_default("1"))
                    .with_constraint(
                        RawConstraint::new(
                            "order_items_order_id_fkey",
                            ConstraintKind::ForeignKey,
                            "FOREIGN KEY (order_id) REFERENCES orders(id)",
                        )
                        .with_columns(["order_id"])
                        .with_reference(RawReference::new(["order_id"], "orders", ["id"])),
                    )
                    .with_constraint(
                        RawConstraint::new(
                            "order_items_product_id_fkey",
                            ConstraintKind::ForeignKey,
                            "FOREIGN KEY (product_id) REFERENCES products(id)",
                        )
                        .with_columns(["product_id"])
                        .with_reference(RawReference::new(["product_id"], "products", ["id"])),
                    ),
            )
            .with_table(
                FixtureTable::new("audit_log")
                    .with_column(RawColumn::new("id", "bigint"))
                    .with_column(RawColumn::new("actor_id", "integer").with_nullable(true))
                    .with_constraint(
                        RawConstraint::new(
                            "audit_log_actor_id_fkey",
                            ConstraintKind::ForeignKey,
                            "FOREIGN KEY (actor_id) REFERENCES auth.users(id)",
                        )
                        .with_columns(["actor_id"]),
                    ),
            )
            .with_table(
                FixtureTable::new("order_totals")
                    .with_kind(TableKind::View)
                    .with_definition(" SELECT customer_id, sum(total) AS total FROM shop.orders GROUP BY customer_id;")
                    .with_column(RawColumn::new("customer_id", "integer").with_nullable(true))
                    .with_column(RawColumn::new("total", "numeric").with_nullable(true)),
            )
    }

    /// MySQL-style `hr` schema with a table that references itself
    pub fn self_referencing() -> FixtureDriverBuilder {
        FixtureDriverBuilder::new()
            .with_info("mysql", "8.0.36")
            .with_scope("hr")
            .with_table(
                FixtureTable::new("employees")
                    .with_column(RawColumn::new("id", "int"))
                    .with_column(RawColumn::new("manager_id", "int").with_nullable(true))
                    .with_column(RawColumn::new("name", "varchar(100)"))
                    .with_constraint(
                        RawConstraint::new(
                            "employees_manager_fk",
                            ConstraintKind::ForeignKey,
                            "FOREIGN KEY (manager_id) REFERENCES employees (id)",
                        )
                        .with_columns(["manager_id"])
                        .with_reference(RawReference::new(["manager_id"], "employees", ["id"])),
                    )
                    .with_constraint(
                        RawConstraint::new("PRIMARY", ConstraintKind::PrimaryKey, "PRIMARY KEY (id)")
                            .with_columns(["id"]),
                    ),
            )
    }

    /// Oracle-style `LOGISTICS` owner with composite keys, loaded from YAML
    ///
    /// `SHIPMENTS` references `order_lines` in lower case, which only resolves
    /// under upper-case folding. `ORDER_LINES` carries a foreign key whose
    /// column lists differ in length.
    pub fn composite_keys() -> FixtureDriverBuilder {
        FixtureDriverBuilder::from_yaml(COMPOSITE_KEYS_YAML)
            .expect("composite_keys.yaml is a valid fixture")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalens_catalog::Driver;

    #[tokio::test]
    async fn test_commerce_fixture() {
        let driver = Fixtures::commerce().build();
        let tables = driver.list_tables("shop").await.unwrap();
        assert_eq!(tables.len(), 6);
        assert_eq!(driver.identifier_case(), IdentifierCase::FoldLower);
    }

    #[test]
    fn test_composite_keys_fixture_loads() {
        let driver = Fixtures::composite_keys().build();
        let shipments = driver.get_table("SHIPMENTS").unwrap();
        assert_eq!(shipments.columns.len(), 4);
        assert_eq!(shipments.indexes.len(), 1);
        assert!(shipments.indexes[0].primary);
        let lines = driver.get_table("ORDER_LINES").unwrap();
        assert_eq!(lines.columns[3].default.as_deref(), Some("1"));
    }
}
