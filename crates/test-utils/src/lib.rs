// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for Schemalens
//!
//! This crate provides common testing components including:
//! - An in-memory fixture driver with failure injection and call recording
//! - Canned fixture schemas, in code and in YAML
//! - Schema-specific assertions

pub mod assertions;
pub mod fixture_driver;
pub mod fixtures;

// Re-exports for convenience
pub use assertions::SchemaAssertions;
pub use fixture_driver::{
    Call, FixtureDocument, FixtureDriver, FixtureDriverBuilder, FixtureTable, Operation,
};
pub use fixtures::Fixtures;
