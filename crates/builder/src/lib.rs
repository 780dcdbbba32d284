// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schemalens - Builder
//!
//! Turns a [`Driver`](schemalens_catalog::Driver) into a fully populated
//! [`Schema`](schemalens_ir::Schema).
//!
//! ## Components
//!
//! - **Builder** ([`SchemaBuilder`], [`build`]): runs the read pass and fails
//!   the whole build on the first driver error
//! - **Constraint parser** ([`ConstraintParser`], [`parse_foreign_key`]):
//!   recovers foreign keys from definition text, engine-agnostic
//! - **Resolver** ([`resolve`]): links foreign keys to tables of the same
//!   schema under a pluggable identifier matcher
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemalens_builder::{BuildOptions, SchemaBuilder, TableFilter};
//!
//! let schema = SchemaBuilder::new(driver.as_ref())
//!     .with_options(
//!         BuildOptions::new()
//!             .with_concurrency(4)
//!             .with_filter(TableFilter::new().exclude("tmp_*")),
//!     )
//!     .build("public")
//!     .await?;
//!
//! for relation in &schema.relations {
//!     println!("{} -> {}", relation.table, relation.parent_table);
//! }
//! ```

pub mod builder;
pub mod error;
pub mod options;
pub mod parser;
pub mod resolver;

// Re-exports
pub use builder::{SchemaBuilder, build};
pub use error::{BuildError, BuildResult};
pub use options::{BuildOptions, TableFilter};
pub use parser::{ConstraintParser, ForeignKeyShape, parse_foreign_key};
pub use resolver::resolve;
