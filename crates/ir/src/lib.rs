// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schemalens - Schema Model
//!
//! This crate provides the canonical, driver-independent schema model that
//! every Schemalens driver is normalized into. The model is designed to:
//! - Be engine-agnostic (PostgreSQL, MySQL, Oracle, ...)
//! - Preserve catalog fidelity (native type strings, physical column order,
//!   verbatim constraint definitions)
//! - Be self-contained and serializable, with no live connection attached
//!
//! ## Modules
//!
//! - [`metadata`]: [`Schema`], [`Table`], [`Column`], [`Index`], [`Constraint`], [`Relation`]
//! - [`identifier`]: pluggable identifier case-folding rules
//! - [`diff`]: structural comparison of two schemas

pub mod diff;
pub mod error;
pub mod identifier;
pub mod metadata;

// Re-export commonly used types
pub use diff::{SchemaChange, diff};
pub use error::{ModelError, ModelResult};
pub use identifier::{IdentifierCase, IdentifierMatcher};
pub use metadata::{
    Column, Constraint, ConstraintKind, DriverInfo, Index, Relation, Schema, Table, TableKind,
};
