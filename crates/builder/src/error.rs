// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Build errors
//!
//! Every driver failure is wrapped with the step and table that failed. No
//! step is retried and no partial schema is returned.

use schemalens_catalog::DriverError;
use schemalens_ir::ModelError;
use thiserror::Error;

/// Result type alias for schema builds
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that abort a schema build
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("failed to read driver info: {0}")]
    Info(#[source] DriverError),

    #[error("failed to list tables in scope '{scope}': {source}")]
    ListTables {
        scope: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to list columns of table '{table}': {source}")]
    ListColumns {
        table: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to list indexes of table '{table}': {source}")]
    ListIndexes {
        table: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to list constraints of table '{table}': {source}")]
    ListConstraints {
        table: String,
        #[source]
        source: DriverError,
    },

    #[error("built schema is inconsistent: {0}")]
    InvalidSchema(#[from] ModelError),
}

impl BuildError {
    /// The underlying driver failure, if the build failed reading the catalog
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            BuildError::Info(source)
            | BuildError::ListTables { source, .. }
            | BuildError::ListColumns { source, .. }
            | BuildError::ListIndexes { source, .. }
            | BuildError::ListConstraints { source, .. } => Some(source),
            BuildError::InvalidSchema(_) => None,
        }
    }

    /// Table whose fetch failed, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            BuildError::ListColumns { table, .. }
            | BuildError::ListIndexes { table, .. }
            | BuildError::ListConstraints { table, .. } => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_table_and_cause() {
        let err = BuildError::ListColumns {
            table: "orders".to_string(),
            source: DriverError::permission_denied("information_schema.COLUMNS", "access denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("orders"));
        assert!(msg.contains("information_schema.COLUMNS"));
        assert_eq!(err.table(), Some("orders"));
        assert!(err.driver_error().unwrap().is_permission_denied());
    }

    #[test]
    fn test_invalid_schema_has_no_driver_error() {
        let err = BuildError::from(ModelError::DuplicateTable("orders".to_string()));
        assert!(err.driver_error().is_none());
        assert!(err.table().is_none());
    }
}
