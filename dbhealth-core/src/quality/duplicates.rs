//! Duplicate values in unique-candidate columns.

use super::classifier::is_unique_candidate;
use super::{probes, skip_non_fatal};
use crate::catalog::CatalogIntrospector;
use crate::connection::Session;
use crate::models::{IssueType, QualityIssue, Severity};
use crate::Result;

/// Reports repeated non-null values in columns expected to be unique.
///
/// The count is `non-null values - distinct non-null values`; the percentage
/// is relative to the table's row count. Duplicates are always warnings.
///
/// # Errors
/// Returns the first fatal error (connectivity, permissions).
pub async fn scan_duplicates(
    session: &Session,
    table_patterns: &[String],
) -> Result<Vec<QualityIssue>> {
    session.ping().await?;
    let introspector = CatalogIntrospector::new(session);
    let tables = introspector.list_tables(table_patterns).await?;

    let mut issues = Vec::new();
    for table in &tables {
        let columns = introspector.list_columns(table).await?;
        let candidates: Vec<&str> = columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| is_unique_candidate(name))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let Some(total) = skip_non_fatal(probes::count_rows(session, table).await)? else {
            continue;
        };
        if total == 0 {
            continue;
        }

        for column in candidates {
            let Some(duplicates) =
                skip_non_fatal(probes::count_duplicates(session, table, column).await)?
            else {
                continue;
            };
            if duplicates == 0 {
                continue;
            }

            issues.push(QualityIssue::new(
                table.as_str(),
                column,
                IssueType::Duplicates,
                duplicates,
                total,
                Severity::Warning,
                format!(
                    "Table '{}' has {} duplicate values in '{}'",
                    table, duplicates, column
                ),
            ));
        }
    }

    Ok(issues)
}
