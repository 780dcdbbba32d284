// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Relationship resolver
//!
//! Turns foreign-key constraints into [`Relation`]s between tables of the
//! same schema. Referenced names are matched against table names with an
//! [`IdentifierMatcher`], so the engine's case-folding rule decides what
//! counts as the same table.
//!
//! A reference may be qualified (`sales.customers`). It resolves only when the
//! qualifier names the schema being built; anything else points outside the
//! introspected scope and is dropped, while the constraint itself stays on its
//! table.

use schemalens_ir::identifier::split_qualified;
use schemalens_ir::{IdentifierMatcher, Relation, Schema};
use tracing::debug;

/// Find the table a reference points to
fn resolve_table<'a>(
    schema: &'a Schema,
    reference: &str,
    matcher: &dyn IdentifierMatcher,
) -> Option<&'a str> {
    let parts = split_qualified(reference);
    let (name, qualifiers) = parts.split_last()?;

    match qualifiers {
        [] => {}
        [.., scope] if matcher.matches(scope, &schema.name) => {}
        _ => return None,
    }

    schema
        .tables
        .iter()
        .find(|t| matcher.matches(name, &t.name))
        .map(|t| t.name.as_str())
}

/// Populate `schema.relations` from the foreign keys of its tables
///
/// Existing relations are replaced. Relations follow table order, then
/// constraint order within each table.
pub fn resolve(schema: &mut Schema, matcher: &dyn IdentifierMatcher) {
    let mut relations = Vec::new();

    for table in &schema.tables {
        for constraint in table.foreign_keys() {
            if !constraint.has_reference() {
                continue;
            }
            let Some(reference) = constraint.referenced_table.as_deref() else {
                continue;
            };

            match resolve_table(schema, reference, matcher) {
                Some(parent) => relations.push(Relation {
                    constraint: constraint.name.clone(),
                    table: table.name.clone(),
                    columns: constraint.columns.clone(),
                    parent_table: parent.to_string(),
                    parent_columns: constraint.referenced_columns.clone(),
                    definition: constraint.definition.clone(),
                }),
                None => debug!(
                    table = %table.name,
                    constraint = %constraint.name,
                    reference,
                    "foreign key references a table outside the schema"
                ),
            }
        }
    }

    schema.relations = relations;
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemalens_ir::{Constraint, ConstraintKind, DriverInfo, IdentifierCase, Table};

    fn fk(name: &str, column: &str, parent: &str) -> Constraint {
        Constraint::new(
            name,
            ConstraintKind::ForeignKey,
            format!("FOREIGN KEY ({}) REFERENCES {} (id)", column, parent),
        )
        .with_columns([column])
        .with_reference(parent, ["id"])
    }

    fn schema(name: &str, tables: Vec<Table>) -> Schema {
        let mut schema = Schema::new(name, DriverInfo::new("test", "1"));
        schema.tables = tables;
        schema
    }

    #[test]
    fn test_resolves_simple_reference() {
        let mut s = schema(
            "public",
            vec![
                Table::new("customers"),
                Table::new("orders").with_constraints(vec![fk("orders_fk", "customer_id", "customers")]),
            ],
        );
        resolve(&mut s, &IdentifierCase::Sensitive);

        assert_eq!(s.relations.len(), 1);
        let r = &s.relations[0];
        assert_eq!(r.table, "orders");
        assert_eq!(r.columns, vec!["customer_id"]);
        assert_eq!(r.parent_table, "customers");
        assert_eq!(r.parent_columns, vec!["id"]);
    }

    #[test]
    fn test_dangling_reference_keeps_constraint() {
        let mut s = schema(
            "public",
            vec![Table::new("orders").with_constraints(vec![fk("orders_fk", "customer_id", "customers")])],
        );
        resolve(&mut s, &IdentifierCase::Sensitive);

        assert!(s.relations.is_empty());
        assert_eq!(s.tables[0].constraints.len(), 1);
    }

    #[test]
    fn test_case_folding_is_pluggable() {
        let tables = vec![
            Table::new("CUSTOMERS"),
            Table::new("ORDERS").with_constraints(vec![fk("ORDERS_FK", "CUSTOMER_ID", "customers")]),
        ];

        let mut s = schema("APP", tables.clone());
        resolve(&mut s, &IdentifierCase::Sensitive);
        assert!(s.relations.is_empty());

        let mut s = schema("APP", tables.clone());
        resolve(&mut s, &IdentifierCase::FoldUpper);
        assert_eq!(s.relations[0].parent_table, "CUSTOMERS");

        let mut s = schema("APP", tables);
        resolve(&mut s, &|reference: &str, name: &str| reference.eq_ignore_ascii_case(name));
        assert_eq!(s.relations.len(), 1);
    }

    #[test]
    fn test_quoted_reference_is_not_folded() {
        let tables = vec![
            Table::new("Customers"),
            Table::new("orders").with_constraints(vec![fk("orders_fk", "customer_id", "\"Customers\"")]),
        ];
        let mut s = schema("public", tables);
        resolve(&mut s, &IdentifierCase::FoldLower);
        assert_eq!(s.relations[0].parent_table, "Customers");
    }

    #[test]
    fn test_qualified_reference() {
        let tables = vec![
            Table::new("customers"),
            Table::new("orders").with_constraints(vec![
                fk("same_scope", "customer_id", "sales.customers"),
                fk("other_scope", "legacy_id", "archive.customers"),
            ]),
        ];
        let mut s = schema("sales", tables);
        resolve(&mut s, &IdentifierCase::FoldLower);

        assert_eq!(s.relations.len(), 1);
        assert_eq!(s.relations[0].constraint, "same_scope");
        assert_eq!(s.tables[1].constraints.len(), 2);
    }

    #[test]
    fn test_self_reference() {
        let tables = vec![Table::new("employees").with_constraints(vec![fk(
            "employees_manager_fk",
            "manager_id",
            "employees",
        )])];
        let mut s = schema("hr", tables);
        resolve(&mut s, &IdentifierCase::Sensitive);
        assert!(s.relations[0].is_self_reference());
    }

    #[test]
    fn test_unresolved_foreign_key_is_skipped() {
        let broken = Constraint::new("broken", ConstraintKind::ForeignKey, "FOREIGN KEY garbage");
        let tables = vec![Table::new("orders").with_constraints(vec![broken])];
        let mut s = schema("public", tables);
        resolve(&mut s, &IdentifierCase::Sensitive);
        assert!(s.relations.is_empty());
    }

    #[test]
    fn test_resolve_replaces_existing_relations() {
        let mut s = schema(
            "public",
            vec![
                Table::new("customers"),
                Table::new("orders").with_constraints(vec![fk("orders_fk", "customer_id", "customers")]),
            ],
        );
        resolve(&mut s, &IdentifierCase::Sensitive);
        resolve(&mut s, &IdentifierCase::Sensitive);
        assert_eq!(s.relations.len(), 1);
    }
}
