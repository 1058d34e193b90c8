//! Database sessions.
//!
//! A [`Session`] wraps one `sqlx` Any pool so that the same connection can
//! run either catalog dialect. Pools are created lazily: nothing touches the
//! network until the first probe, which lets an unreachable server surface as
//! a report finding instead of a construction error.

mod config;
pub mod sql;

pub use config::{ConnectionConfig, MAX_POOL_CONNECTIONS};

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

use crate::error::{DbHealthError, redact_database_url};
use crate::models::DatabaseType;
use crate::Result;

/// A pooled, read-only connection to the database under inspection.
#[derive(Debug, Clone)]
pub struct Session {
    pool: AnyPool,
    database_type: DatabaseType,
}

impl Session {
    /// Opens a lazy session for `connection_string`.
    ///
    /// Every pooled connection gets the statement timeout and, unless
    /// disabled, read-only mode from `config`.
    ///
    /// # Errors
    /// Returns a configuration error for invalid settings, an unrecognised
    /// connection string, or a backend whose driver is not compiled in.
    /// Connectivity problems are not reported here.
    pub async fn connect(connection_string: &str, config: &ConnectionConfig) -> Result<Self> {
        use sqlx::Executor;

        config.validate()?;
        let database_type = detect_database_type(connection_string)?;
        ensure_driver_compiled(database_type)?;
        let url = normalize_connection_string(database_type, connection_string);

        sqlx::any::install_default_drivers();

        let statements = session_statements(database_type, config);
        let max_connections = match database_type {
            // Each in-memory SQLite connection would be a separate database
            DatabaseType::SQLite => 1,
            DatabaseType::PostgreSQL | DatabaseType::MySQL => config.max_connections,
        };

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(config.connect_timeout)
            .test_before_acquire(true)
            .after_connect(move |conn, _meta| {
                let statements = statements.clone();
                Box::pin(async move {
                    for statement in &statements {
                        conn.execute(statement.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect_lazy(&url)
            .map_err(|e| {
                DbHealthError::configuration(format!(
                    "Invalid {} connection string {}: {}",
                    database_type,
                    redact_database_url(connection_string),
                    e
                ))
            })?;

        tracing::debug!(
            "Created lazy {} session for {}",
            database_type,
            redact_database_url(connection_string)
        );

        Ok(Self {
            pool,
            database_type,
        })
    }

    /// Wraps an existing pool. No session settings are applied.
    pub const fn from_pool(pool: AnyPool, database_type: DatabaseType) -> Self {
        Self {
            pool,
            database_type,
        }
    }

    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub const fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    /// Runs `SELECT 1` to prove the session is usable.
    ///
    /// # Errors
    /// Returns the mapped driver error, usually a fatal connection error.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DbHealthError::from_sqlx("connectivity probe", e))?;
        Ok(())
    }

    /// Runs a single-value COUNT-style query, flooring negative results at 0.
    ///
    /// # Errors
    /// Returns the mapped driver error, tagged with `context`.
    pub async fn fetch_count(&self, sql: &str, context: &str) -> Result<u64> {
        tracing::trace!("{}: {}", context, sql);
        let value: Option<i64> = sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbHealthError::from_sqlx(context, e))?;
        Ok(value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0))
    }

    /// Quotes a catalog name for interpolation into probe SQL.
    pub fn quote_identifier(&self, name: &str) -> String {
        sql::quote_identifier(self.database_type, name)
    }

    /// Closes the pool. In-flight probes fail with a connection error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Detects the backend from a connection string.
///
/// # Errors
/// Returns a configuration error for unrecognised formats.
pub fn detect_database_type(connection_string: &str) -> Result<DatabaseType> {
    if connection_string.starts_with("postgres://")
        || connection_string.starts_with("postgresql://")
    {
        Ok(DatabaseType::PostgreSQL)
    } else if connection_string.starts_with("mysql://") {
        Ok(DatabaseType::MySQL)
    } else if connection_string.starts_with("sqlite:")
        || connection_string == ":memory:"
        || connection_string.ends_with(".db")
        || connection_string.ends_with(".sqlite")
        || connection_string.ends_with(".sqlite3")
    {
        Ok(DatabaseType::SQLite)
    } else {
        Err(DbHealthError::configuration(format!(
            "Unrecognized database connection string format: {}",
            redact_database_url(connection_string)
        )))
    }
}

/// The Any driver only resolves drivers at first connect, so a missing
/// backend feature is caught here instead.
fn ensure_driver_compiled(database_type: DatabaseType) -> Result<()> {
    let (compiled, feature) = match database_type {
        DatabaseType::PostgreSQL => (cfg!(feature = "postgresql"), "postgresql"),
        DatabaseType::MySQL => (cfg!(feature = "mysql"), "mysql"),
        DatabaseType::SQLite => (cfg!(feature = "sqlite"), "sqlite"),
    };
    if compiled {
        Ok(())
    } else {
        Err(DbHealthError::configuration(format!(
            "{} support not compiled in. Use --features {}",
            database_type, feature
        )))
    }
}

/// Turns bare SQLite paths into `sqlite:` URLs the Any driver understands.
fn normalize_connection_string(database_type: DatabaseType, connection_string: &str) -> String {
    match database_type {
        DatabaseType::SQLite if connection_string == ":memory:" => "sqlite::memory:".to_string(),
        DatabaseType::SQLite if !connection_string.starts_with("sqlite:") => {
            format!("sqlite://{}", connection_string)
        }
        _ => connection_string.to_string(),
    }
}

/// Statements run on every new pooled connection.
fn session_statements(database_type: DatabaseType, config: &ConnectionConfig) -> Vec<String> {
    let timeout_ms = config.query_timeout.as_millis();
    let mut statements = Vec::new();
    match database_type {
        DatabaseType::PostgreSQL => {
            statements.push(format!("SET statement_timeout = '{}ms'", timeout_ms));
            statements.push(format!(
                "SET application_name = 'dbhealth-{}'",
                env!("CARGO_PKG_VERSION")
            ));
            if config.read_only {
                statements.push("SET default_transaction_read_only = on".to_string());
            }
        }
        DatabaseType::MySQL => {
            statements.push(format!("SET SESSION MAX_EXECUTION_TIME = {}", timeout_ms));
            if config.read_only {
                statements.push("SET SESSION TRANSACTION READ ONLY".to_string());
            }
        }
        DatabaseType::SQLite => {
            statements.push(format!("PRAGMA busy_timeout = {}", timeout_ms));
            if config.read_only {
                statements.push("PRAGMA query_only = ON".to_string());
            }
        }
    }
    statements
}
