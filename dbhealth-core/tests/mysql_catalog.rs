//! MySQL integration tests for the information-schema catalog.
//!
//! Covers `DATABASE()` scoping, `?` pattern binding, `CAST(... AS CHAR)`
//! decoding through the Any driver and composite foreign keys read from
//! `key_column_usage`. Each test starts a container and needs Docker.

#![cfg(feature = "mysql")]

use dbhealth_core::{
    CatalogIntrospector, ColumnInfo, ConnectionConfig, DatabaseType, DbHealthError, ForeignKeyRef,
    Result, Session,
};
use sqlx::any::AnyPoolOptions;
use std::time::Duration;
use testcontainers_modules::{
    mysql::Mysql,
    testcontainers::{ContainerAsync, runners::AsyncRunner},
};

const LABEL_FIXTURE: &[&str] = &[
    "CREATE TABLE labels (id INT PRIMARY KEY, name VARCHAR(100))",
    "CREATE TABLE releases (label_code VARCHAR(20), catalog_number VARCHAR(20), title TEXT, \
     PRIMARY KEY (label_code, catalog_number))",
    "CREATE TABLE pressings (id INT PRIMARY KEY, label_id INT, release_label VARCHAR(20), \
     release_number VARCHAR(20), \
     FOREIGN KEY (label_id) REFERENCES labels (id), \
     FOREIGN KEY (release_label, release_number) REFERENCES releases (label_code, catalog_number))",
    "CREATE VIEW release_titles AS SELECT title FROM releases",
];

/// Starts MySQL, waits until it answers and applies the fixture.
async fn start_mysql() -> Result<(ContainerAsync<Mysql>, String)> {
    let container = Mysql::default()
        .start()
        .await
        .map_err(|e| DbHealthError::connection_failed("start MySQL container", e))?;
    let port = container
        .get_host_port_ipv4(3306)
        .await
        .map_err(|e| DbHealthError::connection_failed("resolve MySQL port", e))?;
    let database_url = format!("mysql://root@localhost:{port}/test");

    sqlx::any::install_default_drivers();
    let mut attempts = 0;
    let pool = loop {
        match AnyPoolOptions::new().max_connections(1).connect(&database_url).await {
            Ok(pool) => break pool,
            Err(e) if attempts >= 30 => return Err(DbHealthError::from_sqlx("wait for MySQL", e)),
            Err(_) => {
                attempts += 1;
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    };

    for statement in LABEL_FIXTURE {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .map_err(|e| DbHealthError::from_sqlx(format!("seed: {statement}"), e))?;
    }
    pool.close().await;

    Ok((container, database_url))
}

#[tokio::test]
#[ignore = "MySQL requires running container, run with --ignored flag"]
async fn test_mysql_catalog_tables_and_columns() -> Result<()> {
    let (_container, database_url) = start_mysql().await?;
    let session = Session::connect(&database_url, &ConnectionConfig::default()).await?;
    assert_eq!(session.database_type(), DatabaseType::MySQL);
    let catalog = CatalogIntrospector::new(&session);

    let tables = catalog.list_tables(&[]).await?;
    assert_eq!(tables, vec!["labels", "pressings", "releases"]);

    let matched = catalog.list_tables(&["rel%".to_string()]).await?;
    assert_eq!(matched, vec!["releases"]);

    let columns = catalog.list_columns("labels").await?;
    assert_eq!(
        columns,
        vec![
            ColumnInfo {
                name: "id".to_string(),
                data_type: "int".to_string()
            },
            ColumnInfo {
                name: "name".to_string(),
                data_type: "varchar".to_string()
            },
        ]
    );

    session.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "MySQL requires running container, run with --ignored flag"]
async fn test_mysql_catalog_composite_foreign_keys() -> Result<()> {
    let (_container, database_url) = start_mysql().await?;
    let session = Session::connect(&database_url, &ConnectionConfig::default()).await?;
    let catalog = CatalogIntrospector::new(&session);

    let mut foreign_keys = catalog.list_foreign_keys("pressings").await?;
    foreign_keys.sort_by(|a, b| a.column.cmp(&b.column));
    assert_eq!(
        foreign_keys,
        vec![
            ForeignKeyRef {
                column: "label_id".to_string(),
                referenced_table: "labels".to_string(),
                referenced_column: "id".to_string(),
            },
            ForeignKeyRef {
                column: "release_label".to_string(),
                referenced_table: "releases".to_string(),
                referenced_column: "label_code".to_string(),
            },
            ForeignKeyRef {
                column: "release_number".to_string(),
                referenced_table: "releases".to_string(),
                referenced_column: "catalog_number".to_string(),
            },
        ]
    );

    assert!(catalog.list_foreign_keys("labels").await?.is_empty());

    session.close().await;
    Ok(())
}
