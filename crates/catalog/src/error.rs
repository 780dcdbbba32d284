// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Driver operations
//!
//! This module defines the error taxonomy shared by every driver. Callers use
//! it to tell an unusable connection apart from a denied catalog view and from
//! a query the engine rejected.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can occur during Driver operations
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum DriverError {
    /// The connection is unusable
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Access to a catalog view or object was denied
    #[error("Permission denied on {resource}: {message}")]
    PermissionDenied { resource: String, message: String },

    /// The engine rejected a catalog query
    #[error("Query failed: {0}")]
    Query(String),

    /// Invalid driver configuration
    #[error("Invalid driver configuration: {0}")]
    Configuration(String),

    /// The requested engine or operation is not available in this build
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl DriverError {
    pub fn permission_denied(resource: impl Into<String>, message: impl Into<String>) -> Self {
        DriverError::PermissionDenied {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, DriverError::Connection(_))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, DriverError::PermissionDenied { .. })
    }

    /// Report a denied introspection view as a failed query
    ///
    /// Version lookups read a single system view; when it is hidden from the
    /// user the connection is still healthy and the failure is the query's.
    pub fn into_query_error(self) -> Self {
        match self {
            DriverError::PermissionDenied { resource, message } => {
                DriverError::Query(format!("{}: {}", resource, message))
            }
            other => other,
        }
    }
}

/// Whether an engine message reports an authorization failure
///
/// Covers PostgreSQL (`permission denied for ...`), MySQL
/// (`... command denied to user`, `Access denied for user`) and Oracle
/// (`ORA-01031: insufficient privileges`, `ORA-00942: table or view does not exist`,
/// which Oracle also raises for dictionary views the user cannot see).
pub fn is_permission_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("permission denied")
        || lower.contains("access denied")
        || lower.contains("command denied")
        || lower.contains("insufficient privileges")
        || lower.contains("ora-01031")
        || lower.contains("ora-00942")
}

#[cfg(any(feature = "mysql", feature = "postgresql"))]
impl DriverError {
    /// Classify a sqlx error raised while reading `resource`
    pub(crate) fn from_sqlx(err: sqlx::Error, resource: &str) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => {
                DriverError::Connection(format!("{}: {}", resource, err))
            }
            sqlx::Error::Database(db_err) => {
                let sqlstate = db_err.code();
                if sqlstate.as_deref() == Some("42501") || is_permission_message(db_err.message())
                {
                    DriverError::permission_denied(resource, db_err.message())
                } else {
                    DriverError::Query(format!("{}: {}", resource, db_err))
                }
            }
            _ => DriverError::Query(format!("{}: {}", resource, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message_names_resource() {
        let err = DriverError::permission_denied("pg_catalog.pg_class", "permission denied for table pg_class");
        let msg = err.to_string();
        assert!(msg.contains("pg_catalog.pg_class"));
        assert!(err.is_permission_denied());
        assert!(!err.is_connection());
    }

    #[test]
    fn test_is_permission_message() {
        assert!(is_permission_message("permission denied for schema sales"));
        assert!(is_permission_message(
            "SELECT command denied to user 'app'@'localhost' for table 'COLUMNS'"
        ));
        assert!(is_permission_message("ORA-01031: insufficient privileges"));
        assert!(!is_permission_message("syntax error at or near \"FORM\""));
    }
}
