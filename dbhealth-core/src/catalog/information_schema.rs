//! Standard `information_schema` catalog (PostgreSQL, MySQL).

use async_trait::async_trait;
use sqlx::Row;

use super::{CatalogDialect, ColumnInfo, ForeignKeyRef};
use crate::connection::{Session, sql};
use crate::error::DbHealthError;
use crate::models::DatabaseType;
use crate::Result;

/// Reads `information_schema` views scoped to the current schema/database.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformationSchemaCatalog;

/// Expression naming the schema the session works in.
const fn scope(database_type: DatabaseType) -> &'static str {
    match database_type {
        DatabaseType::PostgreSQL => "current_schema()",
        DatabaseType::MySQL | DatabaseType::SQLite => "DATABASE()",
    }
}

/// Catalog identifier columns use types the Any driver cannot decode
/// (`sql_identifier`, `name`), so they are cast to plain text.
fn text(database_type: DatabaseType, expr: &str) -> String {
    match database_type {
        DatabaseType::PostgreSQL | DatabaseType::SQLite => format!("CAST({expr} AS TEXT)"),
        DatabaseType::MySQL => format!("CAST({expr} AS CHAR)"),
    }
}

fn tables_query(database_type: DatabaseType, pattern_count: usize) -> String {
    let mut query = format!(
        "SELECT {} AS table_name FROM information_schema.tables \
         WHERE table_schema = {} AND table_type = 'BASE TABLE'",
        text(database_type, "table_name"),
        scope(database_type)
    );
    if pattern_count > 0 {
        query.push_str(&format!(
            " AND ({})",
            sql::like_any(database_type, "table_name", 1, pattern_count)
        ));
    }
    query.push_str(" ORDER BY table_name");
    query
}

fn columns_query(database_type: DatabaseType) -> String {
    format!(
        "SELECT {} AS column_name, {} AS data_type FROM information_schema.columns \
         WHERE table_schema = {} AND table_name = {} ORDER BY ordinal_position",
        text(database_type, "column_name"),
        text(database_type, "data_type"),
        scope(database_type),
        sql::placeholder(database_type, 1)
    )
}

fn foreign_keys_query(database_type: DatabaseType) -> String {
    match database_type {
        // Pair each referencing column with the referenced key column at the
        // same position so composite keys do not cross-multiply.
        DatabaseType::PostgreSQL | DatabaseType::SQLite => format!(
            "SELECT {} AS column_name, {} AS referenced_table, {} AS referenced_column \
             FROM information_schema.referential_constraints rc \
             JOIN information_schema.key_column_usage kcu \
               ON kcu.constraint_schema = rc.constraint_schema \
              AND kcu.constraint_name = rc.constraint_name \
             JOIN information_schema.key_column_usage ref \
               ON ref.constraint_schema = rc.unique_constraint_schema \
              AND ref.constraint_name = rc.unique_constraint_name \
              AND ref.ordinal_position = kcu.position_in_unique_constraint \
             WHERE kcu.table_schema = {} AND kcu.table_name = {} \
             ORDER BY kcu.constraint_name, kcu.ordinal_position",
            text(database_type, "kcu.column_name"),
            text(database_type, "ref.table_name"),
            text(database_type, "ref.column_name"),
            scope(database_type),
            sql::placeholder(database_type, 1)
        ),
        DatabaseType::MySQL => format!(
            "SELECT {} AS column_name, {} AS referenced_table, {} AS referenced_column \
             FROM information_schema.key_column_usage \
             WHERE table_schema = {} AND table_name = {} \
               AND referenced_table_name IS NOT NULL \
             ORDER BY constraint_name, ordinal_position",
            text(database_type, "column_name"),
            text(database_type, "referenced_table_name"),
            text(database_type, "referenced_column_name"),
            scope(database_type),
            sql::placeholder(database_type, 1)
        ),
    }
}

fn get_text(row: &sqlx::any::AnyRow, column: &str, context: &str) -> Result<String> {
    row.try_get::<String, _>(column)
        .map_err(|e| DbHealthError::from_sqlx(format!("{context}: read {column}"), e))
}

#[async_trait]
impl CatalogDialect for InformationSchemaCatalog {
    fn name(&self) -> &'static str {
        "information_schema"
    }

    async fn list_tables(&self, session: &Session, patterns: &[String]) -> Result<Vec<String>> {
        let query_text = tables_query(session.database_type(), patterns.len());
        let mut query = sqlx::query(&query_text);
        for pattern in patterns {
            query = query.bind(pattern.as_str());
        }

        let rows = query
            .fetch_all(session.pool())
            .await
            .map_err(|e| DbHealthError::from_sqlx("list tables from information_schema", e))?;

        rows.iter()
            .map(|row| get_text(row, "table_name", "list tables"))
            .collect()
    }

    async fn list_columns(&self, session: &Session, table: &str) -> Result<Vec<ColumnInfo>> {
        let context = format!("list columns of {table}");
        let query_text = columns_query(session.database_type());
        let rows = sqlx::query(&query_text)
            .bind(table)
            .fetch_all(session.pool())
            .await
            .map_err(|e| DbHealthError::from_sqlx(context.as_str(), e))?;

        rows.iter()
            .map(|row| {
                Ok(ColumnInfo {
                    name: get_text(row, "column_name", &context)?,
                    data_type: get_text(row, "data_type", &context)?,
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
        let query_text = foreign_keys_query(session.database_type());
        let rows = sqlx::query(&query_text)
            .bind(table)
            .fetch_all(session.pool())
            .await
            .map_err(|e| DbHealthError::from_sqlx(context.as_str(), e))?;

        rows.iter()
            .map(|row| {
                Ok(ForeignKeyRef {
                    column: get_text(row, "column_name", &context)?,
                    referenced_table: get_text(row, "referenced_table", &context)?,
                    referenced_column: get_text(row, "referenced_column", &context)?,
                })
            })
            .collect()
    }
}
