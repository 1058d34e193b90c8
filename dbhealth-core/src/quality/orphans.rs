//! Orphaned foreign-key references.

use super::{probes, skip_non_fatal};
use crate::catalog::CatalogIntrospector;
use crate::connection::Session;
use crate::models::{IssueType, QualityIssue, Severity};
use crate::Result;

/// Reports rows whose non-null foreign key matches no referenced row.
///
/// Orphans are always critical. `total` is the row count of the child table.
/// Catalogs without foreign-key metadata simply yield no issues.
///
/// # Errors
/// Returns the first fatal error (connectivity, permissions).
pub async fn scan_orphans(
    session: &Session,
    table_patterns: &[String],
) -> Result<Vec<QualityIssue>> {
    session.ping().await?;
    let introspector = CatalogIntrospector::new(session);
    let tables = introspector.list_tables(table_patterns).await?;

    let mut issues = Vec::new();
    for table in &tables {
        let foreign_keys = introspector.list_foreign_keys(table).await?;
        if foreign_keys.is_empty() {
            continue;
        }

        let Some(total) = skip_non_fatal(probes::count_rows(session, table).await)? else {
            continue;
        };
        if total == 0 {
            continue;
        }

        for key in &foreign_keys {
            let Some(orphans) = skip_non_fatal(probes::count_orphans(session, table, key).await)?
            else {
                continue;
            };
            if orphans == 0 {
                continue;
            }

            tracing::debug!(
                "{} orphaned rows in {}.{} -> {}.{}",
                orphans,
                table,
                key.column,
                key.referenced_table,
                key.referenced_column
            );
            issues.push(QualityIssue::new(
                table.as_str(),
                key.column.as_str(),
                IssueType::Orphans,
                orphans,
                total,
                Severity::Critical,
                format!(
                    "Table '{}' has {} orphaned records in '{}' referencing '{}.{}'",
                    table, orphans, key.column, key.referenced_table, key.referenced_column
                ),
            ));
        }
    }

    Ok(issues)
}
