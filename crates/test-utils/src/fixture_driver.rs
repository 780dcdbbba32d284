// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Fixture driver implementation for testing
//!
//! Provides an in-memory driver with builder pattern for easy test setup.
//! Tables are returned in the order they were added, failures can be injected
//! per operation and table, and every call is recorded.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use schemalens_catalog::{
    Driver, DriverError, DriverResult, RawColumn, RawConstraint, RawIndex, RawTable,
};
use schemalens_ir::{DriverInfo, IdentifierCase, TableKind};
use serde::{Deserialize, Serialize};

/// Driver operations, for failure injection and call recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Info,
    ListTables,
    ListColumns,
    ListIndexes,
    ListConstraints,
}

/// One recorded driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub scope: Option<String>,
    pub table: Option<String>,
}

/// A table with everything the driver returns for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureTable {
    pub name: String,
    #[serde(default)]
    pub kind: TableKind,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub columns: Vec<RawColumn>,
    #[serde(default)]
    pub indexes: Vec<RawIndex>,
    #[serde(default)]
    pub constraints: Vec<RawConstraint>,
}

impl FixtureTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TableKind::Table,
            comment: None,
            definition: None,
            columns: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: TableKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn with_column(mut self, column: RawColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: RawIndex) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_constraint(mut self, constraint: RawConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn raw(&self) -> RawTable {
        RawTable {
            name: self.name.clone(),
            kind: self.kind.clone(),
            comment: self.comment.clone(),
            definition: self.definition.clone(),
        }
    }
}

/// Serialized form of a fixture driver
///
/// ```yaml
/// name: postgres
/// version: "16.2"
/// scope: public
/// identifier_case: fold_lower
/// tables:
///   - name: customers
///     columns:
///       - { name: id, data_type: integer }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDocument {
    pub name: String,
    pub version: String,
    /// Only this scope has tables; any scope when absent
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub identifier_case: IdentifierCase,
    #[serde(default)]
    pub concurrent: bool,
    #[serde(default)]
    pub tables: Vec<FixtureTable>,
}

#[derive(Debug, Clone)]
struct Failure {
    operation: Operation,
    table: Option<String>,
    error: DriverError,
}

/// Decrements the in-flight counter when a call ends or is cancelled
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory driver for testing
#[derive(Debug, Default)]
pub struct FixtureDriver {
    info: DriverInfo,
    scope: Option<String>,
    tables: Vec<FixtureTable>,
    identifier_case: IdentifierCase,
    concurrent: bool,
    failures: Vec<Failure>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FixtureDriver {
    /// Create a new empty fixture driver
    pub fn new() -> Self {
        Self {
            info: DriverInfo::new("fixture", "1.0"),
            ..Default::default()
        }
    }

    /// Load a fixture driver from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        Ok(FixtureDriverBuilder::from_yaml(yaml)?.build())
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Option<&FixtureTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls of `operation` made for `table`
    pub fn call_count(&self, operation: Operation, table: Option<&str>) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation == operation && c.table.as_deref() == table)
            .count()
    }

    /// Highest number of calls that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn in_scope(&self, scope: &str) -> bool {
        self.scope.as_deref().is_none_or(|s| s == scope)
    }

    async fn enter(
        &self,
        operation: Operation,
        scope: Option<&str>,
        table: Option<&str>,
    ) -> DriverResult<InFlight<'_>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call {
                operation,
                scope: scope.map(str::to_string),
                table: table.map(str::to_string),
            });
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);

        if let Some(delay) = table.and_then(|t| self.delays.get(t)) {
            tokio::time::sleep(*delay).await;
        }

        let failure = self.failures.iter().find(|f| {
            f.operation == operation && (f.table.is_none() || f.table.as_deref() == table)
        });
        match failure {
            Some(f) => Err(f.error.clone()),
            None => Ok(guard),
        }
    }
}

#[async_trait::async_trait]
impl Driver for FixtureDriver {
    async fn info(&self) -> DriverResult<DriverInfo> {
        let _call = self.enter(Operation::Info, None, None).await?;
        Ok(self.info.clone())
    }

    async fn list_tables(&self, scope: &str) -> DriverResult<Vec<RawTable>> {
        let _call = self.enter(Operation::ListTables, Some(scope), None).await?;
        if !self.in_scope(scope) {
            return Ok(Vec::new());
        }
        Ok(self.tables.iter().map(FixtureTable::raw).collect())
    }

    async fn list_columns(&self, scope: &str, table: &str) -> DriverResult<Vec<RawColumn>> {
        let _call = self.enter(Operation::ListColumns, Some(scope), Some(table)).await?;
        Ok(self.get_table(table).map(|t| t.columns.clone()).unwrap_or_default())
    }

    async fn list_indexes(&self, scope: &str, table: &str) -> DriverResult<Vec<RawIndex>> {
        let _call = self.enter(Operation::ListIndexes, Some(scope), Some(table)).await?;
        Ok(self.get_table(table).map(|t| t.indexes.clone()).unwrap_or_default())
    }

    async fn list_constraints(
        &self,
        scope: &str,
        table: &str,
    ) -> DriverResult<Vec<RawConstraint>> {
        let _call = self
            .enter(Operation::ListConstraints, Some(scope), Some(table))
            .await?;
        Ok(self
            .get_table(table)
            .map(|t| t.constraints.clone())
            .unwrap_or_default())
    }

    fn identifier_case(&self) -> IdentifierCase {
        self.identifier_case
    }

    fn supports_concurrent_fetch(&self) -> bool {
        self.concurrent
    }
}

/// Builder for creating fixture drivers with a fluent API
pub struct FixtureDriverBuilder {
    driver: FixtureDriver,
}

impl Default for FixtureDriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDriverBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            driver: FixtureDriver::new(),
        }
    }

    /// Start from a YAML fixture document
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let doc: FixtureDocument = serde_yaml::from_str(yaml)?;
        let mut builder = Self::new()
            .with_info(doc.name, doc.version)
            .with_identifier_case(doc.identifier_case)
            .with_concurrent_fetch(doc.concurrent);
        builder.driver.scope = doc.scope;
        builder.driver.tables = doc.tables;
        Ok(builder)
    }

    /// Set the engine name and version reported by `info()`
    pub fn with_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.driver.info = DriverInfo::new(name, version);
        self
    }

    /// Only report tables for `scope`
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.driver.scope = Some(scope.into());
        self
    }

    /// Add a table
    pub fn with_table(mut self, table: FixtureTable) -> Self {
        self.driver.tables.push(table);
        self
    }

    pub fn with_identifier_case(mut self, case: IdentifierCase) -> Self {
        self.driver.identifier_case = case;
        self
    }

    pub fn with_concurrent_fetch(mut self, concurrent: bool) -> Self {
        self.driver.concurrent = concurrent;
        self
    }

    /// Fail `operation` for every table
    pub fn fail(mut self, operation: Operation, error: DriverError) -> Self {
        self.driver.failures.push(Failure {
            operation,
            table: None,
            error,
        });
        self
    }

    /// Fail `operation` for one table
    pub fn fail_for(
        mut self,
        operation: Operation,
        table: impl Into<String>,
        error: DriverError,
    ) -> Self {
        self.driver.failures.push(Failure {
            operation,
            table: Some(table.into()),
            error,
        });
        self
    }

    /// Delay every per-table call for `table`
    pub fn with_delay(mut self, table: impl Into<String>, delay: Duration) -> Self {
        self.driver.delays.insert(table.into(), delay);
        self
    }

    /// Build the fixture driver
    pub fn build(self) -> FixtureDriver {
        self.driver
    }
}
