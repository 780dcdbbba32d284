// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for the schema model

use serde::Serialize;
use thiserror::Error;

/// Result type alias for model validation
pub type ModelResult<T> = Result<T, ModelError>;

/// Violations of the schema model invariants
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum ModelError {
    /// Two tables share a name
    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),

    /// Two columns of one table share a name
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Relation column lists are empty or differ in length
    #[error(
        "Relation '{constraint}' has {child} child columns but {parent} parent columns"
    )]
    ColumnCountMismatch {
        constraint: String,
        child: usize,
        parent: usize,
    },

    /// Relation names a table that is not part of the schema
    #[error("Relation '{constraint}' refers to unknown table '{table}'")]
    UnknownRelationTable { constraint: String, table: String },
}
