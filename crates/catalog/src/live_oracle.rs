// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Live Oracle driver
//!
//! This module provides an Oracle driver that reads schema metadata from the
//! `ALL_*` data dictionary views over ODBC.
//!
//! **Requirements:**
//! - The `oracle` feature must be enabled
//! - An Oracle ODBC driver must be installed and registered with the driver
//!   manager (unixODBC on Linux/macOS)
//!
//! ODBC handles are not shared between threads: every query opens its own
//! connection inside a mutex and drops it before returning, so calls are
//! serialized and per-table fetches never run concurrently.
//!
//! Foreign keys are emitted as definition text assembled from
//! `ALL_CONSTRAINTS`/`ALL_CONS_COLUMNS` and recovered by the constraint
//! parser. Table names that are not plain upper-case identifiers are quoted in
//! that text so they survive Oracle's upper-case folding rule.

#[cfg(feature = "oracle")]
use {
    crate::config::{DriverConfig, DriverKind},
    crate::error::{DriverError, DriverResult, is_permission_message},
    crate::r#trait::Driver,
    crate::record::{RawColumn, RawConstraint, RawIndex, RawTable, split_column_list},
    async_trait::async_trait,
    odbc_api::{ConnectionOptions, Cursor, Environment, ResultSetMetadata, buffers::TextRowSet},
    schemalens_ir::{ConstraintKind, DriverInfo, IdentifierCase, TableKind},
    std::sync::Arc,
    tokio::sync::Mutex,
    tracing::{debug, info},
};

/// Prefix marking an Oracle ODBC connection string in [`DriverConfig`]
pub const CONNECTION_PREFIX: &str = "oracle:";

/// Rows fetched per ODBC round trip
#[cfg(feature = "oracle")]
const FETCH_BATCH_SIZE: usize = 256;

/// Largest text cell read back, in bytes; longer values fail the query
#[cfg(feature = "oracle")]
const MAX_TEXT_LEN: usize = 65536;

/// Escape a SQL string literal value by doubling single quotes
#[cfg_attr(not(feature = "oracle"), allow(dead_code))]
fn escape_sql_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Quote an identifier unless Oracle would read it back unchanged
#[cfg_attr(not(feature = "oracle"), allow(dead_code))]
fn quote_identifier(ident: &str) -> String {
    let mut chars = ident.chars();
    let plain = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '_' | '$' | '#'));
    if plain {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// Compose the native type string from `ALL_TAB_COLUMNS`
#[cfg_attr(not(feature = "oracle"), allow(dead_code))]
fn column_type(
    data_type: &str,
    char_length: Option<&str>,
    precision: Option<&str>,
    scale: Option<&str>,
) -> String {
    fn positive(v: Option<&str>) -> Option<&str> {
        v.filter(|v| v.parse::<i64>().is_ok_and(|n| n > 0))
    }

    match data_type {
        "VARCHAR2" | "NVARCHAR2" | "CHAR" | "NCHAR" | "RAW" => match positive(char_length) {
            Some(len) => format!("{}({})", data_type, len),
            None => data_type.to_string(),
        },
        "NUMBER" => match (positive(precision), positive(scale)) {
            (Some(p), Some(s)) => format!("NUMBER({},{})", p, s),
            (Some(p), None) => format!("NUMBER({})", p),
            _ => data_type.to_string(),
        },
        _ => data_type.to_string(),
    }
}

#[cfg(feature = "oracle")]
fn table_kind(object_type: &str) -> TableKind {
    match object_type {
        "TABLE" => TableKind::Table,
        "VIEW" => TableKind::View,
        "MATERIALIZED VIEW" => TableKind::MaterializedView,
        other => TableKind::Other(other.to_string()),
    }
}

#[cfg(feature = "oracle")]
fn query_error(resource: &str, e: odbc_api::Error) -> DriverError {
    let message = e.to_string();
    if is_permission_message(&message) {
        DriverError::permission_denied(resource, message)
    } else {
        DriverError::Query(format!("{}: {}", resource, message))
    }
}

/// Like [`query_error`], but a value cut to the buffer size is reported
#[cfg(feature = "oracle")]
fn fetch_error(resource: &str, e: odbc_api::Error) -> DriverError {
    match e {
        odbc_api::Error::TooLargeValueForBuffer { .. } => DriverError::Query(format!(
            "{}: value longer than {} bytes",
            resource, MAX_TEXT_LEN
        )),
        e => query_error(resource, e),
    }
}

#[cfg(feature = "oracle")]
fn cell(row: &[Option<String>], idx: usize) -> Option<String> {
    row.get(idx).cloned().flatten()
}

/// Live Oracle driver over ODBC
#[cfg(feature = "oracle")]
pub struct OracleDriver {
    env: Arc<Environment>,
    connection_string: String,
    /// Serializes ODBC operations
    conn_mutex: Mutex<()>,
    identifier_case: IdentifierCase,
}

#[cfg(feature = "oracle")]
impl OracleDriver {
    /// Create a driver for an ODBC connection string and verify it connects
    pub fn new(connection_string: impl Into<String>) -> DriverResult<Self> {
        let connection_string = connection_string.into();
        let env = Environment::new().map_err(|e| {
            DriverError::Connection(format!(
                "Failed to create ODBC environment: {}. Make sure an Oracle ODBC driver is installed.",
                e
            ))
        })?;

        // Scope the probe connection so it is dropped before env moves
        {
            env.connect_with_connection_string(&connection_string, ConnectionOptions::default())
                .map_err(|e| {
                    DriverError::Connection(format!("Failed to connect to Oracle via ODBC: {}", e))
                })?;
        }

        info!("Connected to Oracle via ODBC");

        Ok(Self {
            env: Arc::new(env),
            connection_string,
            conn_mutex: Mutex::new(()),
            identifier_case: IdentifierCase::FoldUpper,
        })
    }

    /// Open a driver from `config` (`oracle:<odbc connection string>`)
    pub async fn connect(config: &DriverConfig) -> DriverResult<Self> {
        if config.validate()? != DriverKind::Oracle {
            return Err(DriverError::Configuration(format!(
                "connection_string must start with '{}'",
                CONNECTION_PREFIX
            )));
        }
        let odbc = config
            .connection_string
            .strip_prefix(CONNECTION_PREFIX)
            .unwrap_or(&config.connection_string);
        let mut driver = Self::new(odbc)?;
        if let Some(case) = config.identifier_case {
            driver.identifier_case = case;
        }
        Ok(driver)
    }

    /// Builder method: override the identifier case rule
    pub fn with_identifier_case(mut self, case: IdentifierCase) -> Self {
        self.identifier_case = case;
        self
    }

    fn get_connection(&self) -> DriverResult<odbc_api::Connection<'_>> {
        self.env
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(|e| DriverError::Connection(format!("ODBC connection failed: {}", e)))
    }

    /// Execute a query and return rows as text cells
    ///
    /// The connection and cursor live only for the duration of this call.
    fn execute_query(&self, sql: &str, resource: &str) -> DriverResult<Vec<Vec<Option<String>>>> {
        let conn = self.get_connection()?;
        let to_error = |e: odbc_api::Error| query_error(resource, e);

        let mut rows = Vec::new();

        if let Some(mut cursor) = conn.execute(sql, ()).map_err(to_error)? {
            let num_cols = cursor.num_result_cols().map_err(to_error)? as usize;
            let mut buffers = TextRowSet::for_cursor(FETCH_BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LEN))
                .map_err(to_error)?;
            let mut row_cursor = cursor.bind_buffer(&mut buffers).map_err(to_error)?;

            // Truncated cells fail the query
            while let Some(batch) = row_cursor
                .fetch_with_truncation_check(true)
                .map_err(|e| fetch_error(resource, e))?
            {
                for row_idx in 0..batch.num_rows() {
                    let row = (0..num_cols)
                        .map(|col_idx| {
                            batch
                                .at(col_idx, row_idx)
                                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                        })
                        .collect();
                    rows.push(row);
                }
            }
        }

        Ok(rows)
    }

    async fn query(&self, sql: &str, resource: &str) -> DriverResult<Vec<Vec<Option<String>>>> {
        let _lock = self.conn_mutex.lock().await;
        self.execute_query(sql, resource)
    }
}

#[cfg(feature = "oracle")]
#[async_trait]
impl Driver for OracleDriver {
    async fn info(&self) -> DriverResult<DriverInfo> {
        let rows = self
            .query("SELECT * FROM v$version", "v$version")
            .await
            .map_err(DriverError::into_query_error)?;

        let version = rows
            .first()
            .and_then(|row| cell(row, 0))
            .ok_or_else(|| DriverError::Query("v$version returned no rows".to_string()))?;

        Ok(DriverInfo::new("oracle", version))
    }

    async fn list_tables(&self, scope: &str) -> DriverResult<Vec<RawTable>> {
        let owner = escape_sql_string(scope);
        let sql = format!(
            r#"
            SELECT o.OBJECT_NAME, o.OBJECT_TYPE, c.COMMENTS
            FROM ALL_OBJECTS o
            LEFT JOIN ALL_TAB_COMMENTS c
                ON c.OWNER = o.OWNER AND c.TABLE_NAME = o.OBJECT_NAME
            WHERE o.OWNER = '{owner}'
              AND o.OBJECT_TYPE IN ('TABLE', 'VIEW', 'MATERIALIZED VIEW')
              AND NOT (o.OBJECT_TYPE = 'TABLE' AND EXISTS (
                  SELECT 1 FROM ALL_MVIEWS m
                  WHERE m.OWNER = o.OWNER AND m.MVIEW_NAME = o.OBJECT_NAME))
            ORDER BY o.OBJECT_NAME
            "#
        );

        let rows = self.query(&sql, "ALL_OBJECTS").await?;
        debug!(scope, count = rows.len(), "listed oracle tables");

        Ok(rows
            .iter()
            .map(|row| RawTable {
                name: cell(row, 0).unwrap_or_default(),
                kind: table_kind(&cell(row, 1).unwrap_or_default()),
                comment: cell(row, 2),
                definition: None,
            })
            .collect())
    }

    async fn list_columns(&self, scope: &str, table: &str) -> DriverResult<Vec<RawColumn>> {
        let owner = escape_sql_string(scope);
        let table = escape_sql_string(table);
        let sql = format!(
            r#"
            SELECT c.COLUMN_NAME, c.DATA_TYPE, c.CHAR_LENGTH, c.DATA_PRECISION, c.DATA_SCALE,
                   c.NULLABLE, c.DATA_DEFAULT, cc.COMMENTS
            FROM ALL_TAB_COLUMNS c
            LEFT JOIN ALL_COL_COMMENTS cc
                ON cc.OWNER = c.OWNER AND cc.TABLE_NAME = c.TABLE_NAME AND cc.COLUMN_NAME = c.COLUMN_NAME
            WHERE c.OWNER = '{owner}'
              AND c.TABLE_NAME = '{table}'
            ORDER BY c.COLUMN_ID
            "#
        );

        let rows = self.query(&sql, "ALL_TAB_COLUMNS").await?;

        Ok(rows
            .iter()
            .map(|row| {
                let data_type = cell(row, 1).unwrap_or_default();
                RawColumn {
                    name: cell(row, 0).unwrap_or_default(),
                    data_type: column_type(
                        &data_type,
                        cell(row, 2).as_deref(),
                        cell(row, 3).as_deref(),
                        cell(row, 4).as_deref(),
                    ),
                    nullable: cell(row, 5).as_deref() == Some("Y"),
                    default: cell(row, 6),
                    comment: cell(row, 7),
                }
            })
            .collect())
    }

    async fn list_indexes(&self, scope: &str, table: &str) -> DriverResult<Vec<RawIndex>> {
        let owner = escape_sql_string(scope);
        let table_lit = escape_sql_string(table);
        let sql = format!(
            r#"
            SELECT i.INDEX_NAME, i.UNIQUENESS,
                   (SELECT LISTAGG(ic.COLUMN_NAME, ', ') WITHIN GROUP (ORDER BY ic.COLUMN_POSITION)
                    FROM ALL_IND_COLUMNS ic
                    WHERE ic.INDEX_OWNER = i.OWNER AND ic.INDEX_NAME = i.INDEX_NAME),
                   (SELECT COUNT(*) FROM ALL_CONSTRAINTS pk
                    WHERE pk.OWNER = i.TABLE_OWNER AND pk.INDEX_NAME = i.INDEX_NAME
                      AND pk.CONSTRAINT_TYPE = 'P')
            FROM ALL_INDEXES i
            WHERE i.TABLE_OWNER = '{owner}'
              AND i.TABLE_NAME = '{table_lit}'
            ORDER BY i.INDEX_NAME
            "#
        );

        let rows = self.query(&sql, "ALL_INDEXES").await?;

        Ok(rows
            .iter()
            .map(|row| {
                let name = cell(row, 0).unwrap_or_default();
                let unique = cell(row, 1).as_deref() == Some("UNIQUE");
                let columns = split_column_list(&cell(row, 2).unwrap_or_default());
                let definition = format!(
                    "CREATE {}INDEX {} ON {} ({})",
                    if unique { "UNIQUE " } else { "" },
                    quote_identifier(&name),
                    quote_identifier(table),
                    columns.join(", ")
                );
                RawIndex {
                    name,
                    definition,
                    columns,
                    unique,
                    primary: cell(row, 3).as_deref().is_some_and(|n| n != "0"),
                }
            })
            .collect())
    }

    async fn list_constraints(
        &self,
        scope: &str,
        table: &str,
    ) -> DriverResult<Vec<RawConstraint>> {
        let owner = escape_sql_string(scope);
        let table = escape_sql_string(table);
        let sql = format!(
            r#"
            SELECT c.CONSTRAINT_NAME, c.CONSTRAINT_TYPE, c.SEARCH_CONDITION_VC,
                   (SELECT LISTAGG(cc.COLUMN_NAME, ', ') WITHIN GROUP (ORDER BY cc.POSITION)
                    FROM ALL_CONS_COLUMNS cc
                    WHERE cc.OWNER = c.OWNER AND cc.CONSTRAINT_NAME = c.CONSTRAINT_NAME),
                   r.OWNER, r.TABLE_NAME,
                   (SELECT LISTAGG(rc.COLUMN_NAME, ', ') WITHIN GROUP (ORDER BY rc.POSITION)
                    FROM ALL_CONS_COLUMNS rc
                    WHERE rc.OWNER = c.R_OWNER AND rc.CONSTRAINT_NAME = c.R_CONSTRAINT_NAME)
            FROM ALL_CONSTRAINTS c
            LEFT JOIN ALL_CONSTRAINTS r
                ON r.OWNER = c.R_OWNER AND r.CONSTRAINT_NAME = c.R_CONSTRAINT_NAME
            WHERE c.OWNER = '{owner}'
              AND c.TABLE_NAME = '{table}'
              AND c.CONSTRAINT_TYPE IN ('P', 'R', 'U', 'C')
            ORDER BY c.CONSTRAINT_NAME
            "#
        );

        let rows = self.query(&sql, "ALL_CONSTRAINTS").await?;

        Ok(rows
            .iter()
            .map(|row| {
                let name = cell(row, 0).unwrap_or_default();
                let columns = cell(row, 3).unwrap_or_default();
                let (kind, definition) = match cell(row, 1).as_deref() {
                    Some("P") => (ConstraintKind::PrimaryKey, format!("PRIMARY KEY ({})", columns)),
                    Some("U") => (ConstraintKind::Unique, format!("UNIQUE ({})", columns)),
                    Some("R") => {
                        let parent = quote_identifier(&cell(row, 5).unwrap_or_default());
                        let parent = match cell(row, 4) {
                            Some(parent_owner) if parent_owner != scope => {
                                format!("{}.{}", quote_identifier(&parent_owner), parent)
                            }
                            _ => parent,
                        };
                        (
                            ConstraintKind::ForeignKey,
                            format!(
                                "FOREIGN KEY ({}) REFERENCES {} ({})",
                                columns,
                                parent,
                                cell(row, 6).unwrap_or_default()
                            ),
                        )
                    }
                    _ => (
                        ConstraintKind::Check,
                        format!("CHECK ({})", cell(row, 2).unwrap_or_default()),
                    ),
                };
                RawConstraint::new(name, kind, definition).with_columns(split_column_list(&columns))
            })
            .collect())
    }

    fn identifier_case(&self) -> IdentifierCase {
        self.identifier_case
    }
}
