// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Build options
//!
//! Deserializable settings that external configuration loading fills in.

use serde::{Deserialize, Serialize};

fn default_concurrency() -> usize {
    1
}

/// Options controlling one schema build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Maximum number of tables fetched at once
    ///
    /// Values above 1 only take effect when the driver supports concurrent
    /// fetches; 0 is treated as 1.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Which tables to include
    #[serde(default)]
    pub filter: TableFilter,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            filter: TableFilter::default(),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Builder method: set table filter
    pub fn with_filter(mut self, filter: TableFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Table filter
///
/// Patterns match whole table names; `*` matches any run of characters.
/// Exclusions win over inclusions. An empty include list includes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TableFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an included table pattern
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Add an excluded table pattern
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Check if a table passes the filter
    pub fn is_table_allowed(&self, table: &str) -> bool {
        if self.exclude.iter().any(|p| wildcard_match(p, table)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| wildcard_match(p, table))
    }
}

/// Match `name` against a pattern where `*` matches any run of characters
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let mut segments = pattern.split('*');
    let first = segments.next().unwrap_or_default();
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let segments: Vec<&str> = segments.collect();
    let Some((last, middle)) = segments.split_last() else {
        // No '*' in the pattern
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
