//! Null detection in key-like columns.

use std::collections::BTreeMap;

use super::classifier::{classify_null_severity, is_key_like};
use super::{probes, skip_non_fatal};
use crate::catalog::CatalogIntrospector;
use crate::connection::Session;
use crate::models::{IssueType, QualityIssue, percent_of};
use crate::Result;

/// Key terms used by [`quick_null_scan`] when the caller has none.
pub const DEFAULT_KEY_TERMS: &[&str] = &["id", "_id", "isrc"];

/// Null counts per table and column, both ordered by name.
pub type NullCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// Reports nulls in key-like columns of every matching table.
///
/// Tables without rows are skipped. A table or column whose probe fails for a
/// non-fatal reason is logged and skipped.
///
/// # Errors
/// Returns the first fatal error (connectivity, permissions).
pub async fn scan_nulls(session: &Session, table_patterns: &[String]) -> Result<Vec<QualityIssue>> {
    session.ping().await?;
    let introspector = CatalogIntrospector::new(session);
    let tables = introspector.list_tables(table_patterns).await?;
    tracing::debug!("Scanning {} tables for nulls", tables.len());

    let mut issues = Vec::new();
    for table in &tables {
        let columns = introspector.list_columns(table).await?;
        let key_columns: Vec<&str> = columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| is_key_like(name))
            .collect();
        if key_columns.is_empty() {
            continue;
        }

        let Some(total) = skip_non_fatal(probes::count_rows(session, table).await)? else {
            continue;
        };
        if total == 0 {
            tracing::debug!("Skipping empty table {}", table);
            continue;
        }

        for column in key_columns {
            let Some(nulls) = skip_non_fatal(probes::count_nulls(session, table, column).await)?
            else {
                continue;
            };
            if nulls == 0 {
                continue;
            }

            let percent = percent_of(nulls, total);
            let severity = classify_null_severity(column, percent);
            issues.push(QualityIssue::new(
                table.as_str(),
                column,
                IssueType::Nulls,
                nulls,
                total,
                severity,
                format!(
                    "Table '{}' has {} null values in '{}' ({:.1}%)",
                    table, nulls, column, percent
                ),
            ));
        }
    }

    tracing::debug!("Null scan found {} issues", issues.len());
    Ok(issues)
}

/// Lightweight null scan: `{table: {column: null_count}}`.
///
/// Columns are selected when their name contains any of `key_terms`
/// (case-sensitive). Tables and columns without nulls are omitted. No row
/// counts or severities are computed.
///
/// # Errors
/// Returns the first fatal error (connectivity, permissions).
pub async fn quick_null_scan(
    session: &Session,
    table_patterns: &[String],
    key_terms: &[&str],
) -> Result<NullCounts> {
    let introspector = CatalogIntrospector::new(session);
    let tables = introspector.list_tables(table_patterns).await?;

    let mut results = NullCounts::new();
    for table in tables {
        let columns = introspector.list_columns(&table).await?;
        let mut counts = BTreeMap::new();
        for column in columns
            .into_iter()
            .filter(|c| key_terms.iter().any(|term| c.name.contains(term)))
        {
            let Some(nulls) =
                skip_non_fatal(probes::count_nulls(session, &table, &column.name).await)?
            else {
                continue;
            };
            if nulls > 0 {
                counts.insert(column.name, nulls);
            }
        }
        if !counts.is_empty() {
            results.insert(table, counts);
        }
    }
    Ok(results)
}
