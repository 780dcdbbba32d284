// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Driver trait for catalog access
//!
//! This module defines the async Driver trait that every supported engine
//! implements. Drivers share no logic beyond this contract.

use schemalens_ir::{DriverInfo, IdentifierCase};

use crate::error::DriverResult;
use crate::record::{RawColumn, RawConstraint, RawIndex, RawTable};

/// Driver trait for reading catalog metadata from one engine
///
/// All operations are read-only. `scope` is the schema, catalog or owner
/// name being introspected.
///
/// # Examples
///
/// ```rust,ignore
/// use schemalens_catalog::{Driver, DriverError};
///
/// async fn table_names(driver: &dyn Driver, scope: &str) -> Result<Vec<String>, DriverError> {
///     let tables = driver.list_tables(scope).await?;
///     Ok(tables.into_iter().map(|t| t.name).collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Driver: Send + Sync {
    /// Engine name and version string
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Connection` if the connection is unusable.
    /// Returns `DriverError::Query` if the version query itself fails, for
    /// example because the version view is hidden from the user.
    async fn info(&self) -> DriverResult<DriverInfo>;

    /// List tables, views and materialized views in `scope`, ordered by name
    ///
    /// An empty vector means the scope has no tables.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::PermissionDenied` if the catalog view cannot be read.
    async fn list_tables(&self, scope: &str) -> DriverResult<Vec<RawTable>>;

    /// List the columns of `table` in physical (ordinal) order
    async fn list_columns(&self, scope: &str, table: &str) -> DriverResult<Vec<RawColumn>>;

    /// List the indexes of `table`, ordered by name
    async fn list_indexes(&self, scope: &str, table: &str) -> DriverResult<Vec<RawIndex>>;

    /// List the constraints of `table`, ordered by name
    ///
    /// Every record carries its definition text. Foreign keys should be
    /// classified as [`ConstraintKind::ForeignKey`](schemalens_ir::ConstraintKind)
    /// and carry a structured reference only when the engine exposes one. A
    /// record left as `ConstraintKind::Other` is still recovered as a foreign
    /// key when its text parses as one; primary key, unique and check records
    /// are never parsed.
    async fn list_constraints(&self, scope: &str, table: &str)
    -> DriverResult<Vec<RawConstraint>>;

    /// How the engine maps identifiers written in SQL text to catalog names
    fn identifier_case(&self) -> IdentifierCase {
        IdentifierCase::Sensitive
    }

    /// Whether calls may run concurrently, each on its own connection
    fn supports_concurrent_fetch(&self) -> bool {
        false
    }
}
