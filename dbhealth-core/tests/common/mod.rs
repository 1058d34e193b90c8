//! Shared fixtures for the SQLite-backed integration tests.

#![allow(dead_code)]

use dbhealth_core::{DatabaseType, DbHealthError, Result, Session};
use sqlx::any::AnyPoolOptions;

/// Opens a single-connection in-memory database and applies `statements`.
///
/// Foreign-key enforcement is switched off first so fixtures can contain
/// orphaned rows.
pub async fn seeded_session(statements: &[&str]) -> Result<Session> {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| DbHealthError::from_sqlx("open in-memory database", e))?;

    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&pool)
        .await
        .map_err(|e| DbHealthError::from_sqlx("disable foreign keys", e))?;
    for statement in statements {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .map_err(|e| DbHealthError::from_sqlx(format!("seed: {statement}"), e))?;
    }
    Ok(Session::from_pool(pool, DatabaseType::SQLite))
}

/// authors/books with one orphan and one null key, tracks with duplicates,
/// users with 50% null emails.
pub const CATALOG_FIXTURE: &[&str] = &[
    "CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT)",
    "INSERT INTO authors (id, name) VALUES (1, 'Le Guin'), (2, 'Butler')",
    "CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT, author_id INTEGER REFERENCES authors(id))",
    "INSERT INTO books (id, title, author_id) VALUES (1, 'A', 1), (2, 'B', 99), (3, 'C', NULL), (4, 'D', 2)",
    "CREATE TABLE tracks (id INTEGER PRIMARY KEY, isrc TEXT, label_code TEXT)",
    "INSERT INTO tracks (id, isrc, label_code) VALUES (1, 'USA1', 'SP'), (2, 'USA1', 'SP'), (3, 'USB2', 'SP'), (4, NULL, '4AD')",
    "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT)",
    "INSERT INTO users (id, email) VALUES (1, 'a@example.com'), (2, NULL), (3, NULL), (4, 'd@example.com')",
];

/// Asserts the report ordering contract: severity, then table, then column.
pub fn assert_report_order(issues: &[dbhealth_core::QualityIssue]) {
    for pair in issues.windows(2) {
        let key = |i: &dbhealth_core::QualityIssue| {
            (i.severity(), i.table().to_string(), i.column().to_string())
        };
        assert!(
            key(&pair[0]) <= key(&pair[1]),
            "issues out of order: {:?} before {:?}",
            key(&pair[0]),
            key(&pair[1])
        );
    }
}
