//! SQLite embedded catalog: `sqlite_master` and the pragma table functions.

use async_trait::async_trait;
use sqlx::Row;

use super::{CatalogDialect, ColumnInfo, ForeignKeyRef};
use crate::connection::{Session, sql};
use crate::error::DbHealthError;
use crate::models::DatabaseType;
use crate::Result;

/// Reads SQLite's built-in catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteCatalog;

const COLUMNS_QUERY: &str = "SELECT name AS column_name, type AS data_type \
     FROM pragma_table_info(?) ORDER BY cid";

const FOREIGN_KEYS_QUERY: &str = "SELECT seq, \"from\" AS column_name, \
     \"table\" AS referenced_table, \"to\" AS referenced_column \
     FROM pragma_foreign_key_list(?) ORDER BY id, seq";

const PRIMARY_KEY_QUERY: &str =
    "SELECT name FROM pragma_table_info(?) WHERE pk > 0 ORDER BY pk";

fn tables_query(pattern_count: usize) -> String {
    let mut query = String::from(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    );
    if pattern_count > 0 {
        query.push_str(&format!(
            " AND ({})",
            sql::like_any(DatabaseType::SQLite, "name", 1, pattern_count)
        ));
    }
    query.push_str(" ORDER BY name");
    query
}

async fn primary_key_columns(session: &Session, table: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(PRIMARY_KEY_QUERY)
        .bind(table)
        .fetch_all(session.pool())
        .await
        .map_err(|e| DbHealthError::from_sqlx(format!("read primary key of {table}"), e))
}

#[async_trait]
impl CatalogDialect for SqliteCatalog {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn list_tables(&self, session: &Session, patterns: &[String]) -> Result<Vec<String>> {
        let query_text = tables_query(patterns.len());
        let mut query = sqlx::query_scalar::<_, String>(&query_text);
        for pattern in patterns {
            query = query.bind(pattern.as_str());
        }
        query
            .fetch_all(session.pool())
            .await
            .map_err(|e| DbHealthError::from_sqlx("list tables from sqlite_master", e))
    }

    async fn list_columns(&self, session: &Session, table: &str) -> Result<Vec<ColumnInfo>> {
        let context = format!("list columns of {table}");
        let rows = sqlx::query(COLUMNS_QUERY)
            .bind(table)
            .fetch_all(session.pool())
            .await
            .map_err(|e| DbHealthError::from_sqlx(context.as_str(), e))?;

        rows.iter()
            .map(|row| {
                let name: String = row
                    .try_get("column_name")
                    .map_err(|e| DbHealthError::from_sqlx(context.as_str(), e))?;
                let data_type: Option<String> = row
                    .try_get("data_type")
                    .map_err(|e| DbHealthError::from_sqlx(context.as_str(), e))?;
                Ok(ColumnInfo {
                    name,
                    data_type: data_type.unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn list_foreign_keys(
        &self,
        session: &Session,
        table: &str,
    ) -> Result<Vec<ForeignKeyRef>> {
        let context = format!("list foreign keys of {table}");
        let rows = sqlx::query(FOREIGN_KEYS_QUERY)
            .bind(table)
            .fetch_all(session.pool())
            .await
            .map_err(|e| DbHealthError::from_sqlx(context.as_str(), e))?;

        let mut foreign_keys = Vec::with_capacity(rows.len());
        for row in &rows {
            let decode = |e| DbHealthError::from_sqlx(context.as_str(), e);
            let seq: i64 = row.try_get("seq").map_err(decode)?;
            let column: String = row.try_get("column_name").map_err(decode)?;
            let referenced_table: String = row.try_get("referenced_table").map_err(decode)?;
            let referenced_column: Option<String> =
                row.try_get("referenced_column").map_err(decode)?;

            // `REFERENCES parent` without a column list targets the parent's primary key
            let referenced_column = match referenced_column {
                Some(name) => name,
                None => {
                    let key = primary_key_columns(session, &referenced_table).await?;
                    let position = usize::try_from(seq).unwrap_or(usize::MAX);
                    let Some(name) = key.into_iter().nth(position) else {
                        tracing::warn!(
                            "Skipping foreign key {}.{}: {} has no matching primary key column",
                            table,
                            column,
                            referenced_table
                        );
                        continue;
                    };
                    name
                }
            };

            foreign_keys.push(ForeignKeyRef {
                column,
                referenced_table,
                referenced_column,
            });
        }
        Ok(foreign_keys)
    }
}
