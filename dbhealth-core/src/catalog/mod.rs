//! Catalog introspection.
//!
//! Tables, columns and foreign keys are read through two dialects: the
//! standard information schema first, then SQLite's embedded catalog when the
//! first attempt fails. Which dialect answered is invisible to callers.
//!
//! # Failure policy
//! If both dialects fail the introspector returns an empty list, so a single
//! unreadable table does not stop a scan. The exception is a fatal fallback
//! error (connectivity, permissions): it is returned so the calling detector
//! can report it.

mod information_schema;
mod sqlite;


pub use information_schema::InformationSchemaCatalog;
pub use sqlite::SqliteCatalog;

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;

use crate::connection::Session;
use crate::Result;

/// A column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Backend type name, verbatim (may be empty for untyped SQLite columns)
    pub data_type: String,
}

/// One column of a foreign-key constraint.
///
/// Composite keys produce one entry per column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyRef {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// One way of reading the catalog.
#[async_trait]
pub trait CatalogDialect: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Base tables in the current scope whose names match any pattern.
    ///
    /// An empty pattern list matches every table.
    async fn list_tables(&self, session: &Session, patterns: &[String]) -> Result<Vec<String>>;

    /// Columns of `table` in declaration order.
    async fn list_columns(&self, session: &Session, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Foreign-key columns of `table` in declaration order.
    async fn list_foreign_keys(&self, session: &Session, table: &str)
    -> Result<Vec<ForeignKeyRef>>;
}

/// Reads catalog metadata with automatic dialect fallback.
pub struct CatalogIntrospector<'a> {
    session: &'a Session,
    primary: Box<dyn CatalogDialect>,
    fallback: Box<dyn CatalogDialect>,
}

impl<'a> CatalogIntrospector<'a> {
    /// Information schema first, SQLite catalog second.
    pub fn new(session: &'a Session) -> Self {
        Self::with_dialects(
            session,
            Box::new(InformationSchemaCatalog),
            Box::new(SqliteCatalog),
        )
    }

    pub fn with_dialects(
        session: &'a Session,
        primary: Box<dyn CatalogDialect>,
        fallback: Box<dyn CatalogDialect>,
    ) -> Self {
        Self {
            session,
            primary,
            fallback,
        }
    }

    /// Table names sorted by name.
    ///
    /// # Errors
    /// Only fatal errors from the fallback dialect are returned.
    pub async fn list_tables(&self, patterns: &[String]) -> Result<Vec<String>> {
        let primary = self.primary.list_tables(self.session, patterns).await;
        let mut tables = self
            .resolve("tables", primary, || {
                self.fallback.list_tables(self.session, patterns)
            })
            .await?;
        tables.sort();
        tables.dedup();
        Ok(tables)
    }

    /// Columns of `table` in declaration order.
    ///
    /// # Errors
    /// Only fatal errors from the fallback dialect are returned.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let primary = self.primary.list_columns(self.session, table).await;
        self.resolve(table, primary, || {
            self.fallback.list_columns(self.session, table)
        })
        .await
    }

    /// Foreign keys of `table` as (column, referenced table, referenced column).
    ///
    /// # Errors
    /// Only fatal errors from the fallback dialect are returned.
    pub async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRef>> {
        let primary = self.primary.list_foreign_keys(self.session, table).await;
        self.resolve(table, primary, || {
            self.fallback.list_foreign_keys(self.session, table)
        })
        .await
    }

    async fn resolve<T, F, Fut>(
        &self,
        subject: &str,
        primary: Result<Vec<T>>,
        fallback: F,
    ) -> Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let primary_error = match primary {
            Ok(items) => return Ok(items),
            Err(e) => e,
        };
        tracing::debug!(
            "{} catalog failed for {}, trying {}: {}",
            self.primary.name(),
            subject,
            self.fallback.name(),
            primary_error
        );

        match fallback().await {
            Ok(items) => Ok(items),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!("Catalog unavailable for {}: {}", subject, e.detailed());
                Ok(Vec::new())
            }
        }
    }
}
