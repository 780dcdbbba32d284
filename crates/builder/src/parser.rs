// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Foreign-key definition parser
//!
//! Recovers the shape of a foreign key from its definition text for engines
//! that expose no structured linkage. The parser is engine-agnostic: it only
//! knows the generic clause
//!
//! ```text
//! FOREIGN KEY (a, b) REFERENCES [schema.]table (x, y)
//! ```
//!
//! Anything that does not have that shape, or whose column lists are empty or
//! of different lengths, is reported as "not a foreign key" (`None`). The
//! parser never fails.

use std::sync::OnceLock;

use regex::Regex;

/// Structural shape of a foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyShape {
    /// Child columns, in declaration order
    pub columns: Vec<String>,
    /// Referenced table as written, possibly qualified and quoted
    pub referenced_table: String,
    /// Parent columns, in declaration order
    pub referenced_columns: Vec<String>,
}

fn foreign_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // The table name is a run of quoted parts or bare characters other
        // than whitespace and '('.
        Regex::new(
            r#"(?i)FOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+((?:"[^"]*"|`[^`]*`|\[[^\]]*\]|[^\s("`\[])+)\s*\(([^)]*)\)"#,
        )
        .expect("valid foreign key regex")
    })
}

/// Split a column list; `None` if any element is empty
fn column_list(list: &str) -> Option<Vec<String>> {
    list.split(',')
        .map(|c| {
            let c = c.trim();
            (!c.is_empty()).then(|| c.to_string())
        })
        .collect()
}

/// Parse a foreign-key definition
///
/// # Examples
///
/// ```
/// use schemalens_builder::parse_foreign_key;
///
/// let fk = parse_foreign_key("FOREIGN KEY (customer_id) REFERENCES customers (id)").unwrap();
/// assert_eq!(fk.columns, vec!["customer_id"]);
/// assert_eq!(fk.referenced_table, "customers");
/// assert_eq!(fk.referenced_columns, vec!["id"]);
///
/// assert!(parse_foreign_key("CHECK (price > 0)").is_none());
/// ```
pub fn parse_foreign_key(definition: &str) -> Option<ForeignKeyShape> {
    let caps = foreign_key_regex().captures(definition)?;

    let columns = column_list(caps.get(1)?.as_str())?;
    let referenced_table = caps.get(2)?.as_str().to_string();
    let referenced_columns = column_list(caps.get(3)?.as_str())?;

    if columns.len() != referenced_columns.len() {
        return None;
    }

    Some(ForeignKeyShape {
        columns,
        referenced_table,
        referenced_columns,
    })
}

/// Constraint definition parser
///
/// Stateless; the compiled pattern is shared process-wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintParser;

impl ConstraintParser {
    pub fn new() -> Self {
        Self
    }

    /// See [`parse_foreign_key`]
    pub fn parse(&self, definition: &str) -> Option<ForeignKeyShape> {
        parse_foreign_key(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_foreign_key() {
        let fk = parse_foreign_key("FOREIGN KEY (customer_id) REFERENCES customers (id)").unwrap();
        assert_eq!(fk.columns, vec!["customer_id"]);
        assert_eq!(fk.referenced_table, "customers");
        assert_eq!(fk.referenced_columns, vec!["id"]);
    }

    #[test]
    fn test_composite_foreign_key() {
        let fk = parse_foreign_key("FOREIGN KEY (a, b) REFERENCES t (x, y)").unwrap();
        assert_eq!(fk.columns, vec!["a", "b"]);
        assert_eq!(fk.referenced_table, "t");
        assert_eq!(fk.referenced_columns, vec!["x", "y"]);
    }

    #[test]
    fn test_postgres_style_without_space() {
        let fk = parse_foreign_key(
            "FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE",
        )
        .unwrap();
        assert_eq!(fk.referenced_table, "customers");
        assert_eq!(fk.referenced_columns, vec!["id"]);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let fk = parse_foreign_key("foreign key(a) references t(x)").unwrap();
        assert_eq!(fk.columns, vec!["a"]);
        assert_eq!(fk.referenced_table, "t");
    }

    #[test]
    fn test_qualified_and_quoted_table() {
        let fk = parse_foreign_key(r#"FOREIGN KEY (a) REFERENCES sales."Order Lines" (x)"#).unwrap();
        assert_eq!(fk.referenced_table, r#"sales."Order Lines""#);

        let fk = parse_foreign_key("FOREIGN KEY (a) REFERENCES `shop`.`order-lines` (x)").unwrap();
        assert_eq!(fk.referenced_table, "`shop`.`order-lines`");

        let fk = parse_foreign_key("FOREIGN KEY (a) REFERENCES billing$data.inv#1 (x)").unwrap();
        assert_eq!(fk.referenced_table, "billing$data.inv#1");
    }

    #[test]
    fn test_constraint_prefix_is_ignored() {
        let fk = parse_foreign_key(
            "CONSTRAINT fk_orders FOREIGN KEY (customer_id) REFERENCES customers (id)",
        )
        .unwrap();
        assert_eq!(fk.columns, vec!["customer_id"]);
    }

    #[test]
    fn test_unequal_column_lists_fail_closed() {
        assert!(parse_foreign_key("FOREIGN KEY (a, b) REFERENCES t (x)").is_none());
        assert!(parse_foreign_key("FOREIGN KEY (a) REFERENCES t (x, y)").is_none());
    }

    #[test]
    fn test_empty_column_lists_fail_closed() {
        assert!(parse_foreign_key("FOREIGN KEY () REFERENCES t ()").is_none());
        assert!(parse_foreign_key("FOREIGN KEY (a, ) REFERENCES t (x, y)").is_none());
        assert!(parse_foreign_key("FOREIGN KEY (a,,b) REFERENCES t (x, y, z)").is_none());
    }

    #[test]
    fn test_non_foreign_keys() {
        for text in [
            "CHECK (price > 0)",
            "UNIQUE (email)",
            "PRIMARY KEY (id)",
            "",
            "REFERENCES customers (id)",
            "FOREIGN KEY (a) REFERENCES t",
        ] {
            assert!(parse_foreign_key(text).is_none(), "{text:?}");
        }
    }

    #[test]
    fn test_constraint_parser_delegates() {
        let parser = ConstraintParser::new();
        assert_eq!(
            parser.parse("FOREIGN KEY (a) REFERENCES t (x)"),
            parse_foreign_key("FOREIGN KEY (a) REFERENCES t (x)")
        );
    }
}
