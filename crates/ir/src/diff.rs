// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema diff
//!
//! Structural comparison of two [`Schema`] values. An empty change list means
//! the schemas are structurally equal, which is what repeated builds against
//! an unchanged database must produce.

use serde::{Deserialize, Serialize};

use crate::metadata::{Column, Constraint, DriverInfo, Index, Relation, Schema, Table, TableKind};

/// A single difference between two schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaChange {
    ScopeChanged { from: String, to: String },
    DriverChanged { from: DriverInfo, to: DriverInfo },
    TableAdded(String),
    TableRemoved(String),
    TableKindChanged { table: String, from: TableKind, to: TableKind },
    TableCommentChanged { table: String, from: Option<String>, to: Option<String> },
    TableDefinitionChanged { table: String },
    ColumnAdded { table: String, column: String },
    ColumnRemoved { table: String, column: String },
    ColumnChanged { table: String, from: Column, to: Column },
    ColumnsReordered { table: String },
    IndexAdded { table: String, index: String },
    IndexRemoved { table: String, index: String },
    IndexChanged { table: String, index: String },
    ConstraintAdded { table: String, constraint: String },
    ConstraintRemoved { table: String, constraint: String },
    ConstraintChanged { table: String, constraint: String },
    RelationAdded(Relation),
    RelationRemoved(Relation),
}

/// Compare two schemas
///
/// Changes are reported in table order of `old` first (changes and removals),
/// then additions in table order of `new`, then relation changes.
pub fn diff(old: &Schema, new: &Schema) -> Vec<SchemaChange> {
    let mut changes = Vec::new();

    if old.name != new.name {
        changes.push(SchemaChange::ScopeChanged {
            from: old.name.clone(),
            to: new.name.clone(),
        });
    }
    if old.driver != new.driver {
        changes.push(SchemaChange::DriverChanged {
            from: old.driver.clone(),
            to: new.driver.clone(),
        });
    }

    for old_table in &old.tables {
        match new.find_table(&old_table.name) {
            Some(new_table) => diff_table(old_table, new_table, &mut changes),
            None => changes.push(SchemaChange::TableRemoved(old_table.name.clone())),
        }
    }
    for new_table in &new.tables {
        if old.find_table(&new_table.name).is_none() {
            changes.push(SchemaChange::TableAdded(new_table.name.clone()));
        }
    }

    for relation in &old.relations {
        if !new.relations.contains(relation) {
            changes.push(SchemaChange::RelationRemoved(relation.clone()));
        }
    }
    for relation in &new.relations {
        if !old.relations.contains(relation) {
            changes.push(SchemaChange::RelationAdded(relation.clone()));
        }
    }

    changes
}

fn diff_table(old: &Table, new: &Table, changes: &mut Vec<SchemaChange>) {
    let table = || old.name.clone();

    if old.kind != new.kind {
        changes.push(SchemaChange::TableKindChanged {
            table: table(),
            from: old.kind.clone(),
            to: new.kind.clone(),
        });
    }
    if old.comment != new.comment {
        changes.push(SchemaChange::TableCommentChanged {
            table: table(),
            from: old.comment.clone(),
            to: new.comment.clone(),
        });
    }
    if old.definition != new.definition {
        changes.push(SchemaChange::TableDefinitionChanged { table: table() });
    }

    for column in &old.columns {
        match new.find_column(&column.name) {
            Some(other) if other != column => changes.push(SchemaChange::ColumnChanged {
                table: table(),
                from: column.clone(),
                to: other.clone(),
            }),
            Some(_) => {}
            None => changes.push(SchemaChange::ColumnRemoved {
                table: table(),
                column: column.name.clone(),
            }),
        }
    }
    for column in &new.columns {
        if old.find_column(&column.name).is_none() {
            changes.push(SchemaChange::ColumnAdded {
                table: table(),
                column: column.name.clone(),
            });
        }
    }

    // Only meaningful when both sides hold the same set of columns.
    let shared_order = |a: &Table, b: &Table| -> Vec<String> {
        a.columns
            .iter()
            .filter(|c| b.find_column(&c.name).is_some())
            .map(|c| c.name.clone())
            .collect()
    };
    if shared_order(old, new) != shared_order(new, old) {
        changes.push(SchemaChange::ColumnsReordered { table: table() });
    }

    diff_named(
        &old.indexes,
        &new.indexes,
        |i: &Index| &i.name,
        |index| SchemaChange::IndexAdded { table: table(), index },
        |index| SchemaChange::IndexRemoved { table: table(), index },
        |index| SchemaChange::IndexChanged { table: table(), index },
        changes,
    );
    diff_named(
        &old.constraints,
        &new.constraints,
        |c: &Constraint| &c.name,
        |constraint| SchemaChange::ConstraintAdded { table: table(), constraint },
        |constraint| SchemaChange::ConstraintRemoved { table: table(), constraint },
        |constraint| SchemaChange::ConstraintChanged { table: table(), constraint },
        changes,
    );
}

fn diff_named<T: PartialEq>(
    old: &[T],
    new: &[T],
    name: impl Fn(&T) -> &String,
    added: impl Fn(String) -> SchemaChange,
    removed: impl Fn(String) -> SchemaChange,
    changed: impl Fn(String) -> SchemaChange,
    changes: &mut Vec<SchemaChange>,
) {
    for item in old {
        match new.iter().find(|other| name(other) == name(item)) {
            Some(other) if other != item => changes.push(changed(name(item).clone())),
            Some(_) => {}
            None => changes.push(removed(name(item).clone())),
        }
    }
    for item in new {
        if !old.iter().any(|other| name(other) == name(item)) {
            changes.push(added(name(item).clone()));
        }
    }
}
