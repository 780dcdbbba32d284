// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Raw catalog records
//!
//! Rows as a driver reads them from the engine's catalog, before they are
//! normalized into the schema model. Kinds are already mapped onto the
//! model's enums; everything else is carried verbatim.

use serde::{Deserialize, Serialize};

use schemalens_ir::{ConstraintKind, TableKind};

/// A table, view or materialized view row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
    #[serde(default)]
    pub kind: TableKind,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            comment: None,
            definition: None,
        }
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Builder method: set view definition
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }
}

/// A column row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    /// Engine-native type string
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: false,
            default: None,
            comment: None,
        }
    }

    /// Builder method: set nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: set default expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// An index row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndex {
    pub name: String,
    pub definition: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub primary: bool,
}

/// Structured foreign-key linkage, for engines that expose it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReference {
    pub columns: Vec<String>,
    /// Schema of the referenced table, when the engine reports it
    #[serde(default)]
    pub referenced_schema: Option<String>,
    /// Catalog name of the referenced table, unqualified
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

impl RawReference {
    pub fn new<C, R>(columns: C, referenced_table: impl Into<String>, referenced_columns: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_schema: None,
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Builder method: set the referenced table's schema
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.referenced_schema = Some(schema.into());
        self
    }
}

/// A constraint row
///
/// `definition` always carries the engine's text for the constraint, so a
/// foreign key without `reference` can still be recovered by parsing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConstraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub definition: String,
    /// Constrained columns, when the engine lists them separately
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub reference: Option<RawReference>,
}

impl RawConstraint {
    pub fn new(name: impl Into<String>, kind: ConstraintKind, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: definition.into(),
            columns: Vec::new(),
            reference: None,
        }
    }

    /// Builder method: set constrained columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: attach structured foreign-key linkage
    pub fn with_reference(mut self, reference: RawReference) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Split a comma separated column list, dropping surrounding whitespace
pub fn split_column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_column_list() {
        assert_eq!(split_column_list("a, b ,c"), vec!["a", "b", "c"]);
        assert!(split_column_list("").is_empty());
    }

    #[test]
    fn test_reference_schema_defaults_to_none() {
        let reference: RawReference = serde_json::from_str(
            r#"{"columns":["a"],"referenced_table":"t","referenced_columns":["id"]}"#,
        )
        .unwrap();
        assert_eq!(reference, RawReference::new(["a"], "t", ["id"]));
        assert!(reference.referenced_schema.is_none());
    }
}
