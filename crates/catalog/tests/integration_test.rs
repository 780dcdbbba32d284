// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the catalog crate

use schemalens_catalog::{
    Driver, DriverConfig, DriverError, DriverKind, DriverResult, RawColumn, RawConstraint,
    RawIndex, RawReference, RawTable, connect,
};
use schemalens_ir::{ConstraintKind, DriverInfo, IdentifierCase, IdentifierMatcher, TableKind};

// In-memory driver implementation for integration testing
struct TestDriver {
    deny_tables: bool,
}

#[async_trait::async_trait]
impl Driver for TestDriver {
    async fn info(&self) -> DriverResult<DriverInfo> {
        Ok(DriverInfo::new("test", "1.2.3"))
    }

    async fn list_tables(&self, scope: &str) -> DriverResult<Vec<RawTable>> {
        if self.deny_tables {
            return Err(DriverError::permission_denied(
                "information_schema.TABLES",
                "SELECT command denied",
            ));
        }
        if scope != "shop" {
            return Ok(Vec::new());
        }
        Ok(vec![
            RawTable::new("customers", TableKind::Table).with_comment("People who buy things"),
            RawTable::new("orders", TableKind::Table),
            RawTable::new("recent_orders", TableKind::View)
                .with_definition("SELECT * FROM orders WHERE placed_at > now() - interval '7 days'"),
        ])
    }

    async fn list_columns(&self, _scope: &str, table: &str) -> DriverResult<Vec<RawColumn>> {
        match table {
            "customers" => Ok(vec![
                RawColumn::new("id", "integer"),
                RawColumn::new("email", "varchar(255)").with_comment("login"),
            ]),
            "orders" => Ok(vec![
                RawColumn::new("id", "integer"),
                RawColumn::new("customer_id", "integer").with_nullable(true),
                RawColumn::new("note", "text").with_nullable(true).with_default(""),
            ]),
            _ => Ok(Vec::new()),
        }
    }

    async fn list_indexes(&self, _scope: &str, table: &str) -> DriverResult<Vec<RawIndex>> {
        Ok(vec![RawIndex {
            name: format!("{}_pkey", table),
            definition: format!("CREATE UNIQUE INDEX {}_pkey ON {} (id)", table, table),
            columns: vec!["id".to_string()],
            unique: true,
            primary: true,
        }])
    }

    async fn list_constraints(
        &self,
        _scope: &str,
        table: &str,
    ) -> DriverResult<Vec<RawConstraint>> {
        match table {
            "orders" => Ok(vec![
                RawConstraint::new(
                    "orders_customer_id_fkey",
                    ConstraintKind::ForeignKey,
                    "FOREIGN KEY (customer_id) REFERENCES customers(id)",
                )
                .with_columns(["customer_id"])
                .with_reference(RawReference::new(["customer_id"], "customers", ["id"])),
            ]),
            _ => Ok(Vec::new()),
        }
    }
}

#[tokio::test]
async fn test_driver_as_trait_object() {
    let driver: Box<dyn Driver> = Box::new(TestDriver { deny_tables: false });

    let info = driver.info().await.unwrap();
    assert_eq!(info.name, "test");
    assert_eq!(info.database_version, "1.2.3");

    let tables = driver.list_tables("shop").await.unwrap();
    let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["customers", "orders", "recent_orders"]);
    assert_eq!(tables[2].kind, TableKind::View);
    assert!(tables[2].definition.is_some());
}

#[tokio::test]
async fn test_trait_defaults() {
    let driver = TestDriver { deny_tables: false };
    assert_eq!(driver.identifier_case(), IdentifierCase::Sensitive);
    assert!(!driver.supports_concurrent_fetch());
    assert!(driver.identifier_case().matches("Orders", "Orders"));
    assert!(!driver.identifier_case().matches("orders", "Orders"));
}

#[tokio::test]
async fn test_empty_scope_is_not_an_error() {
    let driver = TestDriver { deny_tables: false };
    let tables = driver.list_tables("nowhere").await.unwrap();
    assert!(tables.is_empty());
}

#[tokio::test]
async fn test_permission_denied_is_distinct_from_empty() {
    let driver = TestDriver { deny_tables: true };
    let err = driver.list_tables("shop").await.unwrap_err();
    assert!(err.is_permission_denied());
    assert!(err.to_string().contains("information_schema.TABLES"));
}

#[tokio::test]
async fn test_column_defaults_keep_empty_string() {
    let driver = TestDriver { deny_tables: false };
    let columns = driver.list_columns("shop", "orders").await.unwrap();
    assert_eq!(columns[0].default, None);
    assert_eq!(columns[2].default.as_deref(), Some(""));
    assert!(columns[1].nullable);
    assert!(!columns[0].nullable);
}

#[tokio::test]
async fn test_structured_reference_matches_definition() {
    let driver = TestDriver { deny_tables: false };
    let constraints = driver.list_constraints("shop", "orders").await.unwrap();
    assert_eq!(constraints.len(), 1);

    let fk = &constraints[0];
    assert!(fk.kind.is_foreign_key());
    let reference = fk.reference.as_ref().unwrap();
    assert_eq!(reference.referenced_table, "customers");
    assert_eq!(reference.columns, fk.columns);
}

#[tokio::test]
async fn test_connect_unknown_engine() {
    let err = connect(&DriverConfig::new("sqlite://shop.db")).await.err().unwrap();
    assert!(matches!(err, DriverError::Configuration(_)));
}

#[cfg(not(feature = "oracle"))]
#[tokio::test]
async fn test_connect_engine_not_compiled_in() {
    let err = connect(&DriverConfig::new("oracle:Driver={Oracle};Dbq=XE"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, DriverError::NotSupported(_)));
}

#[test]
fn test_config_from_json() {
    let config: DriverConfig = serde_json::from_str(
        r#"{"connection_string": "mysql://app@db/shop", "pool_size": 2, "identifier_case": "fold_lower"}"#,
    )
    .unwrap();
    assert_eq!(config.validate().unwrap(), DriverKind::MySql);
    assert_eq!(config.pool_size, 2);
    assert_eq!(config.identifier_case, Some(IdentifierCase::FoldLower));
}

#[test]
fn test_error_display() {
    let err = DriverError::Query("syntax error".to_string());
    assert_eq!(err.to_string(), "Query failed: syntax error");

    let err = DriverError::permission_denied("v$version", "ORA-00942").into_query_error();
    assert!(matches!(err, DriverError::Query(_)));
}
