// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema model
//!
//! This module defines the canonical, driver-independent representation of a
//! database schema: tables, columns, indexes, constraints and the relations
//! derived from foreign keys.
//!
//! A [`Schema`] owns its tables; each [`Table`] owns its columns, indexes and
//! constraints. A [`Relation`] names the tables it connects instead of owning
//! them, so the whole graph is plain data that can be cloned, compared and
//! serialized without any live connection attached.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Engine identity reported by a driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverInfo {
    /// Engine name (e.g. "postgres", "mysql", "oracle")
    pub name: String,
    /// Version string as returned by the engine's introspection query
    pub database_version: String,
}

impl DriverInfo {
    pub fn new(name: impl Into<String>, database_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database_version: database_version.into(),
        }
    }
}

/// Table kind classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    #[default]
    Table,
    View,
    MaterializedView,
    Foreign,
    /// Engine-specific kind, kept verbatim
    Other(String),
}

/// Constraint kind classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
    /// Engine-specific kind (exclusion, trigger, ...), kept verbatim
    Other(String),
}

impl ConstraintKind {
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, ConstraintKind::ForeignKey)
    }
}

/// A table column
///
/// `data_type` is the engine-native type string and is never normalized.
/// `default` distinguishes "no default" (`None`) from an empty default
/// expression (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub comment: Option<String>,
}

impl Column {
    /// Create a new non-nullable column without default or comment
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

/// A table index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    /// Index definition text as reported by the engine
    pub definition: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub primary: bool,
}

impl Index {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            columns: Vec::new(),
            unique: false,
            primary: false,
        }
    }

    /// Builder method: set indexed columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: mark as unique
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Builder method: mark as the primary key index
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }
}

/// A table constraint
///
/// For foreign keys, `columns`, `referenced_table` and `referenced_columns`
/// are filled when the reference could be resolved either from structured
/// catalog data or from the definition text. An unresolvable foreign key keeps
/// its definition with empty reference fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name (may be synthetic when the engine does not name it)
    pub name: String,
    pub kind: ConstraintKind,
    /// Definition text, verbatim
    pub definition: String,
    /// Constrained (child) columns
    pub columns: Vec<String>,
    pub referenced_table: Option<String>,
    pub referenced_columns: Vec<String>,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        kind: ConstraintKind,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            definition: definition.into(),
            columns: Vec::new(),
            referenced_table: None,
            referenced_columns: Vec::new(),
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

    /// Builder method: set the referenced table and columns
    pub fn with_reference<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.referenced_table = Some(table.into());
        self.referenced_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this is a foreign key whose reference is fully known
    pub fn has_reference(&self) -> bool {
        self.kind.is_foreign_key()
            && self.referenced_table.is_some()
            && !self.columns.is_empty()
            && self.columns.len() == self.referenced_columns.len()
    }
}

/// A database table, view or materialized view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub kind: TableKind,
    pub comment: Option<String>,
    /// View definition, when the engine exposes one
    pub definition: Option<String>,
    /// Columns in physical order
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub constraints: Vec<Constraint>,
}

impl Table {
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

    /// Builder method: set table kind
    pub fn with_kind(mut self, kind: TableKind) -> Self {
        self.kind = kind;
        self
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

    /// Builder method: set columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: set indexes
    pub fn with_indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    /// Builder method: set constraints
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Get column by exact name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get constraint by exact name
    pub fn find_constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Get the primary key constraint, if any
    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::PrimaryKey)
    }

    /// Get all foreign key constraints, resolved or not
    pub fn foreign_keys(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| c.kind.is_foreign_key())
    }
}

/// A foreign-key edge between two tables
///
/// `columns[i]` of `table` references `parent_columns[i]` of `parent_table`.
/// `table` and `parent_table` may be the same table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Name of the constraint this relation was derived from
    pub constraint: String,
    pub table: String,
    pub columns: Vec<String>,
    pub parent_table: String,
    pub parent_columns: Vec<String>,
    /// Definition text of the originating constraint
    pub definition: String,
}

impl Relation {
    pub fn is_self_reference(&self) -> bool {
        self.table == self.parent_table
    }
}

/// Root of the schema model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Scope (schema, catalog or owner) that was introspected
    pub name: String,
    pub driver: DriverInfo,
    pub tables: Vec<Table>,
    pub relations: Vec<Relation>,
}

impl Schema {
    pub fn new(name: impl Into<String>, driver: DriverInfo) -> Self {
        Self {
            name: name.into(),
            driver,
            tables: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Get table by exact name
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Relations in which `table` is the child or the parent
    pub fn find_relations_for<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Relation> {
        self.relations
            .iter()
            .filter(move |r| r.table == table || r.parent_table == table)
    }

    /// Check the structural invariants of the model
    pub fn validate(&self) -> ModelResult<()> {
        let mut table_names = HashSet::new();
        for table in &self.tables {
            if !table_names.insert(table.name.as_str()) {
                return Err(ModelError::DuplicateTable(table.name.clone()));
            }

            let mut column_names = HashSet::new();
            for column in &table.columns {
                if !column_names.insert(column.name.as_str()) {
                    return Err(ModelError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        for relation in &self.relations {
            if relation.columns.is_empty()
                || relation.columns.len() != relation.parent_columns.len()
            {
                return Err(ModelError::ColumnCountMismatch {
                    constraint: relation.constraint.clone(),
                    child: relation.columns.len(),
                    parent: relation.parent_columns.len(),
                });
            }
            for endpoint in [&relation.table, &relation.parent_table] {
                if !table_names.contains(endpoint.as_str()) {
                    return Err(ModelError::UnknownRelationTable {
                        constraint: relation.constraint.clone(),
                        table: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Table {
        Table::new("orders")
            .with_columns(vec![
                Column::new("id", "integer"),
                Column::new("customer_id", "integer").with_nullable(true),
            ])
            .with_constraints(vec![
                Constraint::new("orders_pkey", ConstraintKind::PrimaryKey, "PRIMARY KEY (id)")
                    .with_columns(["id"]),
                Constraint::new(
                    "orders_customer_fk",
                    ConstraintKind::ForeignKey,
                    "FOREIGN KEY (customer_id) REFERENCES customers (id)",
                )
                .with_columns(["customer_id"])
                .with_reference("customers", ["id"]),
            ])
    }

    #[test]
    fn test_table_lookups() {
        let table = orders();
        assert!(table.find_column("customer_id").is_some());
        assert!(table.find_column("missing").is_none());
        assert_eq!(table.primary_key().unwrap().name, "orders_pkey");
        assert_eq!(table.foreign_keys().count(), 1);
    }

    #[test]
    fn test_constraint_has_reference() {
        let table = orders();
        assert!(table.find_constraint("orders_customer_fk").unwrap().has_reference());
        assert!(!table.find_constraint("orders_pkey").unwrap().has_reference());

        let unparsed = Constraint::new("fk", ConstraintKind::ForeignKey, "garbage");
        assert!(!unparsed.has_reference());
    }

    #[test]
    fn test_validate_rejects_duplicate_table() {
        let mut schema = Schema::new("public", DriverInfo::new("postgres", "16"));
        schema.tables.push(Table::new("users"));
        schema.tables.push(Table::new("users"));

        assert_eq!(
            schema.validate(),
            Err(ModelError::DuplicateTable("users".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_column() {
        let mut schema = Schema::new("public", DriverInfo::default());
        schema.tables.push(
            Table::new("users")
                .with_columns(vec![Column::new("id", "int"), Column::new("id", "int")]),
        );

        assert!(matches!(
            schema.validate(),
            Err(ModelError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_uneven_relation() {
        let mut schema = Schema::new("public", DriverInfo::default());
        schema.tables.push(Table::new("a"));
        schema.relations.push(Relation {
            constraint: "a_fk".to_string(),
            table: "a".to_string(),
            columns: vec!["x".to_string(), "y".to_string()],
            parent_table: "a".to_string(),
            parent_columns: vec!["id".to_string()],
            definition: String::new(),
        });

        assert!(matches!(
            schema.validate(),
            Err(ModelError::ColumnCountMismatch { child: 2, parent: 1, .. })
        ));
    }

    #[test]
    fn test_self_reference() {
        let relation = Relation {
            constraint: "employees_manager_fk".to_string(),
            table: "employees".to_string(),
            columns: vec!["manager_id".to_string()],
            parent_table: "employees".to_string(),
            parent_columns: vec!["id".to_string()],
            definition: String::new(),
        };
        assert!(relation.is_self_reference());
    }
}
