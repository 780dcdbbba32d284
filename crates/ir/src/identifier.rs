// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Identifier matching
//!
//! Engines disagree on how an identifier written in SQL text maps to the name
//! stored in the catalog:
//!
//! - **Oracle** folds unquoted identifiers to upper case
//! - **PostgreSQL** folds unquoted identifiers to lower case
//! - **MySQL** stores names as written and compares them according to the
//!   platform's file system, so the right rule depends on the server
//!
//! Quoted identifiers (`"x"`, `` `x` ``, `[x]`) are never folded.
//!
//! Matching is expressed through the [`IdentifierMatcher`] trait so callers can
//! plug in a rule of their own; [`IdentifierCase`] covers the common cases and
//! any `Fn(&str, &str) -> bool` closure works as a matcher too.

use serde::{Deserialize, Serialize};

/// Decides whether an identifier written in SQL text refers to a catalog name
pub trait IdentifierMatcher: Send + Sync {
    /// `reference` is the identifier as written (possibly quoted), `name` is
    /// the name stored in the catalog.
    fn matches(&self, reference: &str, name: &str) -> bool;
}

impl<F> IdentifierMatcher for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, reference: &str, name: &str) -> bool {
        self(reference, name)
    }
}

/// Built-in case-folding rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierCase {
    /// Compare as written, after removing quotes
    #[default]
    Sensitive,
    /// Unquoted identifiers fold to upper case (Oracle)
    FoldUpper,
    /// Unquoted identifiers fold to lower case (PostgreSQL)
    FoldLower,
    /// Compare ignoring case, quoted or not
    Insensitive,
}

impl IdentifierCase {
    /// Catalog form of an identifier written in SQL text
    pub fn canonicalize(&self, reference: &str) -> String {
        let reference = reference.trim();
        if is_quoted(reference) {
            return match self {
                IdentifierCase::Insensitive => unquote(reference).to_lowercase(),
                _ => unquote(reference),
            };
        }
        match self {
            IdentifierCase::Sensitive => reference.to_string(),
            IdentifierCase::FoldUpper => reference.to_uppercase(),
            IdentifierCase::FoldLower | IdentifierCase::Insensitive => reference.to_lowercase(),
        }
    }
}

impl IdentifierMatcher for IdentifierCase {
    fn matches(&self, reference: &str, name: &str) -> bool {
        match self {
            IdentifierCase::Insensitive => self.canonicalize(reference) == name.to_lowercase(),
            _ => self.canonicalize(reference) == name,
        }
    }
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '`' => Some('`'),
        '[' => Some(']'),
        _ => None,
    }
}

/// Whether the identifier is wrapped in a quote pair
pub fn is_quoted(ident: &str) -> bool {
    let mut chars = ident.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => closing_quote(open) == Some(close),
        _ => false,
    }
}

/// Remove surrounding quotes and collapse doubled closing quotes
pub fn unquote(ident: &str) -> String {
    let ident = ident.trim();
    if !is_quoted(ident) {
        return ident.to_string();
    }
    let mut chars = ident.chars();
    let open = chars.next().unwrap_or_default();
    let close = closing_quote(open).unwrap_or(open);
    let inner = &ident[open.len_utf8()..ident.len() - close.len_utf8()];
    let doubled: String = [close, close].iter().collect();
    inner.replace(&doubled, &close.to_string())
}

/// Split a possibly qualified identifier on dots that are outside quotes
///
/// The parts keep their quotes: `"my schema".orders` yields
/// `["\"my schema\"", "orders"]`.
pub fn split_qualified(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut closing: Option<char> = None;

    for (idx, ch) in name.char_indices() {
        match closing {
            Some(close) if ch == close => closing = None,
            Some(_) => {}
            None if ch == '.' => {
                parts.push(name[start..idx].trim());
                start = idx + 1;
            }
            None => closing = closing_quote(ch),
        }
    }
    parts.push(name[start..].trim());
    parts
}
