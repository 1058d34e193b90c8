//! COUNT queries issued by the detectors.
//!
//! Every probe is a single read-only aggregate. Table and column names come
//! from the catalog and are quoted before interpolation.

use crate::catalog::ForeignKeyRef;
use crate::connection::Session;
use crate::Result;

pub(crate) fn count_rows_sql(session: &Session, table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", session.quote_identifier(table))
}

pub(crate) fn count_nulls_sql(session: &Session, table: &str, column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} IS NULL",
        session.quote_identifier(table),
        session.quote_identifier(column)
    )
}

pub(crate) fn count_orphans_sql(session: &Session, table: &str, key: &ForeignKeyRef) -> String {
    let column = session.quote_identifier(&key.column);
    let referenced = session.quote_identifier(&key.referenced_column);
    format!(
        "SELECT COUNT(*) FROM {} child LEFT JOIN {} parent ON child.{column} = parent.{referenced} \
         WHERE child.{column} IS NOT NULL AND parent.{referenced} IS NULL",
        session.quote_identifier(table),
        session.quote_identifier(&key.referenced_table),
    )
}

pub(crate) fn count_duplicates_sql(session: &Session, table: &str, column: &str) -> String {
    let column = session.quote_identifier(column);
    format!(
        "SELECT COUNT({column}) - COUNT(DISTINCT {column}) FROM {} WHERE {column} IS NOT NULL",
        session.quote_identifier(table)
    )
}

pub(crate) async fn count_rows(session: &Session, table: &str) -> Result<u64> {
    session
        .fetch_count(
            &count_rows_sql(session, table),
            &format!("count rows in {table}"),
        )
        .await
}

pub(crate) async fn count_nulls(session: &Session, table: &str, column: &str) -> Result<u64> {
    session
        .fetch_count(
            &count_nulls_sql(session, table, column),
            &format!("count nulls in {table}.{column}"),
        )
        .await
}

pub(crate) async fn count_orphans(session: &Session, table: &str, key: &ForeignKeyRef) -> Result<u64> {
    session
        .fetch_count(
            &count_orphans_sql(session, table, key),
            &format!("count orphans in {table}.{}", key.column),
        )
        .await
}

/// Non-null values minus distinct non-null values, floored at zero.
pub(crate) async fn count_duplicates(session: &Session, table: &str, column: &str) -> Result<u64> {
    session
        .fetch_count(
            &count_duplicates_sql(session, table, column),
            &format!("count duplicates in {table}.{column}"),
        )
        .await
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::models::DatabaseType;
    use sqlx::any::AnyPoolOptions;

    fn session(database_type: DatabaseType) -> Session {
        sqlx::any::install_default_drivers();
        // Never connected: only used for quoting
        let pool = AnyPoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .unwrap();
        Session::from_pool(pool, database_type)
    }

    #[tokio::test]
    async fn test_probe_sql_quotes_identifiers() {
        let session = session(DatabaseType::PostgreSQL);
        assert_eq!(count_rows_sql(&session, "songs"), "SELECT COUNT(*) FROM \"songs\"");
        assert_eq!(
            count_nulls_sql(&session, "songs", "isrc"),
            "SELECT COUNT(*) FROM \"songs\" WHERE \"isrc\" IS NULL"
        );
        assert_eq!(
            count_duplicates_sql(&session, "songs", "isrc"),
            "SELECT COUNT(\"isrc\") - COUNT(DISTINCT \"isrc\") FROM \"songs\" WHERE \"isrc\" IS NOT NULL"
        );
    }

    #[tokio::test]
    async fn test_orphan_sql_is_an_anti_join() {
        let session = session(DatabaseType::MySQL);
        let key = ForeignKeyRef {
            column: "artist_id".to_string(),
            referenced_table: "artists".to_string(),
            referenced_column: "id".to_string(),
        };
        assert_eq!(
            count_orphans_sql(&session, "songs", &key),
            "SELECT COUNT(*) FROM `songs` child LEFT JOIN `artists` parent \
             ON child.`artist_id` = parent.`id` \
             WHERE child.`artist_id` IS NOT NULL AND parent.`id` IS NULL"
        );
    }
}
