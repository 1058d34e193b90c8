//! Session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DbHealthError;

/// Upper bound on pooled connections for a single health check.
pub const MAX_POOL_CONNECTIONS: u32 = 100;

/// Configuration for a database session.
///
/// Credentials live only in the connection string handed to
/// [`Session::connect`](super::Session::connect) and are never stored here.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use dbhealth_core::connection::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .with_query_timeout(Duration::from_secs(5))
///     .with_max_connections(2);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// How long to wait for a pooled connection
    pub connect_timeout: Duration,
    /// Statement timeout applied to every probe
    pub query_timeout: Duration,
    /// Maximum number of connections in pool (SQLite always uses one)
    pub max_connections: u32,
    /// Whether sessions are put into read-only mode
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(30),
            max_connections: 5,
            read_only: true,
        }
    }
}

impl ConnectionConfig {
    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns a configuration error if a value is zero or out of range.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_connections == 0 {
            return Err(DbHealthError::configuration(
                "max_connections must be greater than 0",
            ));
        }

        if self.max_connections > MAX_POOL_CONNECTIONS {
            return Err(DbHealthError::configuration(format!(
                "max_connections should not exceed {MAX_POOL_CONNECTIONS}"
            )));
        }

        if self.connect_timeout.as_secs() == 0 {
            return Err(DbHealthError::configuration(
                "connect_timeout must be at least one second",
            ));
        }

        if self.query_timeout.as_secs() == 0 {
            return Err(DbHealthError::configuration(
                "query_timeout must be at least one second",
            ));
        }

        Ok(())
    }

    /// Builder method to set the connect timeout.
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the statement timeout.
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
