//! Data-quality detectors and the health check that aggregates them.
//!
//! - **Nulls**: missing values in key-like columns, graded by [`classify_null_severity`]
//! - **Orphans**: foreign keys that reference no existing row (always critical)
//! - **Duplicates**: repeated values in unique-candidate columns (always warnings)
//!
//! Detectors only issue read-only COUNT queries and never expose data values.
//! Each detector returns `Err` only for fatal errors; per-table and
//! per-column failures are logged and skipped.
//!
//! # Example
//! ```rust,no_run
//! use dbhealth_core::connection::ConnectionConfig;
//! use dbhealth_core::quality::{ScanConfig, health_check_url};
//!
//! # async fn example() -> dbhealth_core::Result<()> {
//! let scan = ScanConfig::new().with_table_patterns(vec!["song%".to_string()]);
//! let report = health_check_url("sqlite://music.db", &ConnectionConfig::default(), &scan).await?;
//! for issue in report.issues_by_severity() {
//!     println!("{}: {}", issue.severity(), issue.description());
//! }
//! # Ok(())
//! # }
//! ```

mod classifier;
mod config;
mod duplicates;
mod health;
mod nulls;
mod orphans;
mod probes;

pub use classifier::{
    NULL_WARNING_THRESHOLD_PERCENT, classify_null_severity, is_key_like, is_unique_candidate,
};
pub use config::ScanConfig;
pub use duplicates::scan_duplicates;
pub use health::{Detector, HealthChecker, failure_description, health_check, health_check_url};
pub use nulls::{DEFAULT_KEY_TERMS, NullCounts, quick_null_scan, scan_nulls};
pub use orphans::scan_orphans;

use crate::Result;

/// Turns a non-fatal error into `None` after logging it.
///
/// Fatal errors are passed through so the detector stops.
fn skip_non_fatal<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::warn!("Skipping: {}", e.detailed());
            Ok(None)
        }
    }
}
