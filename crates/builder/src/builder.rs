// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema builder
//!
//! Drives one [`Driver`] through a single read pass and assembles a
//! [`Schema`]:
//!
//! 1. `info()`; a failure aborts the build
//! 2. `list_tables(scope)`, then the table filter
//! 3. per table: columns, indexes and constraints, either one table at a time
//!    or with bounded concurrency when the driver allows it
//! 4. tables sorted by name, foreign keys recovered and relations resolved
//!
//! Any driver failure aborts the whole build with the failing step and table
//! attached. Nothing is retried.

use futures::{StreamExt, TryStreamExt, stream};
use schemalens_catalog::{Driver, RawColumn, RawConstraint, RawIndex, RawReference, RawTable};
use schemalens_ir::{Column, Constraint, ConstraintKind, IdentifierMatcher, Index, Schema, Table};
use tracing::{debug, instrument, warn};

use crate::error::{BuildError, BuildResult};
use crate::options::BuildOptions;
use crate::parser::{ForeignKeyShape, parse_foreign_key};
use crate::resolver::resolve;

/// Build the schema for `scope` with default options
///
/// References are matched with the driver's identifier case rule.
///
/// # Examples
///
/// ```rust,ignore
/// use schemalens_catalog::{DriverConfig, connect};
///
/// let driver = connect(&DriverConfig::new("postgres://app@localhost/shop")).await?;
/// let schema = schemalens_builder::build(driver.as_ref(), "public").await?;
/// println!("{}", serde_json::to_string_pretty(&schema)?);
/// ```
pub async fn build(driver: &dyn Driver, scope: &str) -> BuildResult<Schema> {
    SchemaBuilder::new(driver).build(scope).await
}

/// Configurable schema builder
pub struct SchemaBuilder<'a> {
    driver: &'a dyn Driver,
    options: BuildOptions,
    matcher: Option<Box<dyn IdentifierMatcher + 'a>>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(driver: &'a dyn Driver) -> Self {
        Self {
            driver,
            options: BuildOptions::default(),
            matcher: None,
        }
    }

    /// Builder method: set build options
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder method: replace the driver's identifier case rule
    pub fn with_matcher(mut self, matcher: impl IdentifierMatcher + 'a) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    /// Build the schema for `scope`
    #[instrument(skip(self))]
    pub async fn build(&self, scope: &str) -> BuildResult<Schema> {
        let info = self.driver.info().await.map_err(BuildError::Info)?;
        debug!(driver = %info.name, version = %info.database_version, "connected");

        let raw_tables = self
            .driver
            .list_tables(scope)
            .await
            .map_err(|source| BuildError::ListTables {
                scope: scope.to_string(),
                source,
            })?;

        let listed = raw_tables.len();
        let raw_tables: Vec<RawTable> = raw_tables
            .into_iter()
            .filter(|t| self.options.filter.is_table_allowed(&t.name))
            .collect();
        debug!(listed, kept = raw_tables.len(), "tables listed");

        let concurrency = self.options.concurrency.max(1);
        let mut tables = if concurrency > 1 && self.driver.supports_concurrent_fetch() {
            debug!(concurrency, "fetching tables concurrently");
            // Completion order; the first error drops every table still in flight
            stream::iter(raw_tables)
                .map(|raw| self.fetch_table(scope, raw))
                .buffer_unordered(concurrency)
                .try_collect::<Vec<_>>()
                .await?
        } else {
            let mut tables = Vec::with_capacity(raw_tables.len());
            for raw in raw_tables {
                tables.push(self.fetch_table(scope, raw).await?);
            }
            tables
        };

        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let mut schema = Schema::new(scope, info);
        schema.tables = tables;

        match &self.matcher {
            Some(matcher) => resolve(&mut schema, matcher.as_ref()),
            None => resolve(&mut schema, &self.driver.identifier_case()),
        }

        schema.validate()?;

        debug!(
            tables = schema.tables.len(),
            relations = schema.relations.len(),
            "schema built"
        );
        Ok(schema)
    }

    /// Fetch columns, indexes and constraints of one table
    async fn fetch_table(&self, scope: &str, raw: RawTable) -> BuildResult<Table> {
        let columns = self
            .driver
            .list_columns(scope, &raw.name)
            .await
            .map_err(|source| BuildError::ListColumns {
                table: raw.name.clone(),
                source,
            })?;

        let indexes = self
            .driver
            .list_indexes(scope, &raw.name)
            .await
            .map_err(|source| BuildError::ListIndexes {
                table: raw.name.clone(),
                source,
            })?;

        let constraints = self
            .driver
            .list_constraints(scope, &raw.name)
            .await
            .map_err(|source| BuildError::ListConstraints {
                table: raw.name.clone(),
                source,
            })?;

        Ok(Table {
            name: raw.name,
            kind: raw.kind,
            comment: raw.comment,
            definition: raw.definition,
            columns: columns.into_iter().map(column_from_raw).collect(),
            indexes: indexes.into_iter().map(index_from_raw).collect(),
            constraints: constraints
                .into_iter()
                .map(|raw| constraint_from_raw(raw, scope))
                .collect(),
        })
    }
}

fn column_from_raw(raw: RawColumn) -> Column {
    Column {
        name: raw.name,
        data_type: raw.data_type,
        nullable: raw.nullable,
        default: raw.default,
        comment: raw.comment,
    }
}

fn index_from_raw(raw: RawIndex) -> Index {
    Index {
        name: raw.name,
        definition: raw.definition,
        columns: raw.columns,
        unique: raw.unique,
        primary: raw.primary,
    }
}

/// Quote a catalog name unless it reads back unchanged as a bare identifier
fn quote_part(name: &str) -> String {
    let plain = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Structured linkage, if it is usable as is
///
/// A referenced table in another schema is qualified so the resolver can
/// tell it apart from a same-named table in `scope`.
fn shape_from_reference(reference: RawReference, scope: &str) -> Option<ForeignKeyShape> {
    let well_formed = !reference.columns.is_empty()
        && !reference.referenced_table.is_empty()
        && reference.columns.len() == reference.referenced_columns.len();
    if !well_formed {
        return None;
    }

    let referenced_table = match reference.referenced_schema.as_deref() {
        Some(schema) if schema != scope => format!(
            "{}.{}",
            quote_part(schema),
            quote_part(&reference.referenced_table)
        ),
        _ => reference.referenced_table,
    };

    Some(ForeignKeyShape {
        columns: reference.columns,
        referenced_table,
        referenced_columns: reference.referenced_columns,
    })
}

/// Convert a constraint record, recovering foreign-key linkage
///
/// Structured linkage wins; otherwise the definition text is parsed. A
/// foreign key that yields neither is kept without a reference. A record the
/// driver could not classify becomes a foreign key when its text parses as
/// one.
fn constraint_from_raw(raw: RawConstraint, scope: &str) -> Constraint {
    let mut constraint = Constraint::new(raw.name, raw.kind, raw.definition).with_columns(raw.columns);

    if let ConstraintKind::Other(_) = constraint.kind {
        if raw.reference.is_none() {
            if let Some(shape) = parse_foreign_key(&constraint.definition) {
                debug!(constraint = %constraint.name, "unclassified constraint parsed as foreign key");
                constraint.kind = ConstraintKind::ForeignKey;
                apply_shape(&mut constraint, shape);
            }
            return constraint;
        }
    }
    if !constraint.kind.is_foreign_key() {
        return constraint;
    }

    let shape = raw
        .reference
        .and_then(|reference| shape_from_reference(reference, scope))
        .or_else(|| parse_foreign_key(&constraint.definition));

    match shape {
        Some(shape) => apply_shape(&mut constraint, shape),
        None => warn!(
            constraint = %constraint.name,
            definition = %constraint.definition,
            "could not recover foreign key reference"
        ),
    }
    constraint
}

fn apply_shape(constraint: &mut Constraint, shape: ForeignKeyShape) {
    constraint.columns = shape.columns;
    constraint.referenced_table = Some(shape.referenced_table);
    constraint.referenced_columns = shape.referenced_columns;
}
