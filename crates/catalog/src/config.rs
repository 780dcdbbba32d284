// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Driver configuration
//!
//! Connection settings filled in by whatever loads the user's configuration,
//! and a factory that opens the matching driver.
//!
//! ## Connection strings
//!
//! - `postgres://...` or `postgresql://...`: PostgreSQL
//! - `mysql://...`: MySQL
//! - `oracle:<odbc connection string>`: Oracle over ODBC, e.g.
//!   `oracle:Driver={Oracle 21 ODBC driver};Dbq=//db:1521/XE;Uid=app;Pwd=secret`
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemalens_catalog::{DriverConfig, connect};
//!
//! let config = DriverConfig::new("postgres://app@localhost/shop").with_pool_size(4);
//! let driver = connect(&config).await?;
//! ```

use serde::{Deserialize, Serialize};

use schemalens_ir::IdentifierCase;

use crate::error::{DriverError, DriverResult};
use crate::r#trait::Driver;

/// Default connection pool size
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Default query timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Supported engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Postgres,
    MySql,
    Oracle,
}

impl DriverKind {
    /// Pick the engine from the connection string prefix
    pub fn from_connection_string(conn_str: &str) -> DriverResult<Self> {
        if conn_str.starts_with("postgresql://") || conn_str.starts_with("postgres://") {
            Ok(DriverKind::Postgres)
        } else if conn_str.starts_with("mysql://") {
            Ok(DriverKind::MySql)
        } else if conn_str.starts_with("oracle:") {
            Ok(DriverKind::Oracle)
        } else {
            Err(DriverError::Configuration(format!(
                "unrecognized connection string, expected postgres://, mysql:// or oracle: prefix, got: {}",
                &conn_str.chars().take(15).collect::<String>()
            )))
        }
    }
}

/// Connection settings for one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub connection_string: String,
    /// Maximum number of pooled connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Connection acquisition timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Override for the engine's identifier case rule
    #[serde(default)]
    pub identifier_case: Option<IdentifierCase>,
}

impl DriverConfig {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            pool_size: DEFAULT_POOL_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            identifier_case: None,
        }
    }

    /// Builder method: set pool size
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Builder method: set timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Builder method: override identifier case rule
    pub fn with_identifier_case(mut self, case: IdentifierCase) -> Self {
        self.identifier_case = Some(case);
        self
    }

    /// Validate the configuration and return the engine it targets
    ///
    /// This is a format check and doesn't guarantee the connection will succeed.
    pub fn validate(&self) -> DriverResult<DriverKind> {
        if self.connection_string.is_empty() {
            return Err(DriverError::Configuration(
                "connection_string cannot be empty".to_string(),
            ));
        }

        if self.pool_size == 0 {
            return Err(DriverError::Configuration(
                "pool_size must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(DriverError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        DriverKind::from_connection_string(&self.connection_string)
    }
}

/// Open the driver matching `config`
///
/// # Errors
///
/// Returns `DriverError::Configuration` for an invalid configuration,
/// `DriverError::NotSupported` when the engine's feature is not compiled in,
/// and `DriverError::Connection` when the engine cannot be reached.
pub async fn connect(config: &DriverConfig) -> DriverResult<Box<dyn Driver>> {
    let kind = config.validate()?;
    tracing::debug!(?kind, "opening driver");

    match kind {
        #[cfg(feature = "postgresql")]
        DriverKind::Postgres => {
            let driver = crate::live_postgres::PostgresDriver::connect(config).await?;
            Ok(Box::new(driver))
        }
        #[cfg(feature = "mysql")]
        DriverKind::MySql => {
            let driver = crate::live_mysql::MySqlDriver::connect(config).await?;
            Ok(Box::new(driver))
        }
        #[cfg(feature = "oracle")]
        DriverKind::Oracle => {
            let driver = crate::live_oracle::OracleDriver::connect(config).await?;
            Ok(Box::new(driver))
        }
        #[allow(unreachable_patterns)]
        other => Err(DriverError::NotSupported(format!(
            "{:?} driver requires its feature to be enabled",
            other
        ))),
    }
}
