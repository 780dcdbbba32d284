// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schemalens - Driver Layer
//!
//! This crate provides the database driver abstraction for Schemalens.
//! It defines the `Driver` trait and the raw catalog records drivers return:
//!
//! - **PostgreSQL**: `pg_catalog` over sqlx (`postgresql` feature)
//! - **MySQL**: `information_schema` over sqlx (`mysql` feature)
//! - **Oracle**: `ALL_*` dictionary views over ODBC (`oracle` feature)
//!
//! ## Architecture
//!
//! The driver layer is responsible for:
//! - Reading tables, columns, indexes and constraints for one scope
//! - Mapping engine-specific kinds onto the model's enums
//! - Reporting the engine's identifier case rule
//! - Classifying failures (connection, permission, query)
//!
//! Everything else, including foreign-key recovery and relation resolution,
//! happens in `schemalens-builder` and is shared by all engines.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemalens_catalog::{Driver, DriverConfig, DriverError, connect};
//!
//! async fn print_tables(scope: &str) -> Result<(), DriverError> {
//!     let driver = connect(&DriverConfig::new("postgres://app@localhost/shop")).await?;
//!     for table in driver.list_tables(scope).await? {
//!         println!("{} ({:?})", table.name, table.kind);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Implementing the Driver Trait
//!
//! ```rust,ignore
//! use schemalens_catalog::{Driver, DriverResult, RawColumn, RawConstraint, RawIndex, RawTable};
//! use schemalens_ir::DriverInfo;
//! use async_trait::async_trait;
//!
//! struct MyDriver;
//!
//! #[async_trait]
//! impl Driver for MyDriver {
//!     async fn info(&self) -> DriverResult<DriverInfo> {
//!         Ok(DriverInfo::new("mine", "1.0"))
//!     }
//!
//!     async fn list_tables(&self, scope: &str) -> DriverResult<Vec<RawTable>> {
//!         // Your implementation here
//!     }
//!
//!     // list_columns, list_indexes, list_constraints ...
//! }
//! ```

pub mod config;
pub mod error;
pub mod live_mysql;
pub mod live_oracle;
pub mod live_postgres;
pub mod record;
pub mod r#trait;

// Re-exports
pub use config::{DriverConfig, DriverKind, connect};
pub use error::{DriverError, DriverResult};
#[cfg(feature = "mysql")]
pub use live_mysql::MySqlDriver;
#[cfg(feature = "oracle")]
pub use live_oracle::OracleDriver;
#[cfg(feature = "postgresql")]
pub use live_postgres::PostgresDriver;
pub use record::{RawColumn, RawConstraint, RawIndex, RawReference, RawTable, split_column_list};
pub use r#trait::Driver;
