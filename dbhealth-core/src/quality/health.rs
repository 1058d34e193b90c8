//! The health check: runs every enabled detector and builds the report.

use std::time::Instant;

use super::config::ScanConfig;
use super::{scan_duplicates, scan_nulls, scan_orphans};
use crate::connection::{ConnectionConfig, Session};
use crate::error::{DbHealthError, redact_database_url};
use crate::models::{HealthReport, QualityIssue};
use crate::Result;

/// The detectors, in execution order.
///
/// ```rust
/// use dbhealth_core::quality::Detector;
///
/// assert_eq!(Detector::ALL[0], Detector::Nulls);
/// assert_eq!(Detector::Orphans.failure_prefix(), "Orphan scan failed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    /// Nulls in key-like columns
    Nulls,
    /// Foreign keys with no referenced row
    Orphans,
    /// Repeated values in unique-candidate columns
    Duplicates,
}

impl Detector {
    /// Every detector in execution order.
    pub const ALL: [Self; 3] = [Self::Nulls, Self::Orphans, Self::Duplicates];

    /// Prefix of the synthetic issue emitted when this detector fails.
    pub const fn failure_prefix(self) -> &'static str {
        match self {
            Self::Nulls => "Database scan failed",
            Self::Orphans => "Orphan scan failed",
            Self::Duplicates => "Duplicate scan failed",
        }
    }

    const fn enabled(self, config: &ScanConfig) -> bool {
        match self {
            Self::Nulls => config.check_nulls,
            Self::Orphans => config.check_orphans,
            Self::Duplicates => config.check_duplicates,
        }
    }

    async fn run(self, session: &Session, patterns: &[String]) -> Result<Vec<QualityIssue>> {
        match self {
            Self::Nulls => scan_nulls(session, patterns).await,
            Self::Orphans => scan_orphans(session, patterns).await,
            Self::Duplicates => scan_duplicates(session, patterns).await,
        }
    }
}

/// Runs the enabled detectors against one session.
///
/// # Example
/// ```rust,no_run
/// use dbhealth_core::connection::{ConnectionConfig, Session};
/// use dbhealth_core::quality::{HealthChecker, ScanConfig};
///
/// # async fn example() -> dbhealth_core::Result<()> {
/// let session = Session::connect("postgres://scanner@localhost/music", &ConnectionConfig::default()).await?;
/// let report = HealthChecker::new(ScanConfig::default()).check(&session).await;
/// println!("{} issues in {} ms", report.total_issues(), report.scan_time_ms());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HealthChecker {
    config: ScanConfig,
}

impl HealthChecker {
    /// Creates a checker running the detectors enabled in `config`.
    pub const fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// The scan configuration in use.
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs the detectors in order and aggregates their findings.
    ///
    /// Never fails: a detector error becomes one critical `error` issue and
    /// the remaining detectors still run.
    pub async fn check(&self, session: &Session) -> HealthReport {
        let started = Instant::now();
        tracing::info!(
            "Starting health check on {} ({} table patterns)",
            session.database_type(),
            self.config.table_patterns.len()
        );

        let mut issues = Vec::new();
        for detector in Detector::ALL {
            if !detector.enabled(&self.config) {
                tracing::debug!("{:?} detector disabled", detector);
                continue;
            }
            match detector.run(session, &self.config.table_patterns).await {
                Ok(found) => issues.extend(found),
                Err(e) => {
                    tracing::warn!("{:?} detector failed: {}", detector, e.detailed());
                    issues.push(QualityIssue::scan_failure(failure_description(detector, &e)));
                }
            }
        }

        let report = HealthReport::from_issues(issues, started.elapsed());
        tracing::info!(
            "Health check finished in {} ms: {} critical, {} warning, {} info",
            report.scan_time_ms(),
            report.summary().critical,
            report.summary().warning,
            report.summary().info
        );
        report
    }
}

/// Runs a health check with `config` against an open session.
pub async fn health_check(session: &Session, config: &ScanConfig) -> HealthReport {
    HealthChecker::new(config.clone()).check(session).await
}

/// Opens a session for `connection_string` and runs a health check.
///
/// Connectivity problems end up in the report; the session is closed before
/// returning.
///
/// # Errors
/// Returns a configuration error for invalid settings or a malformed
/// connection string. Nothing is scanned in that case.
pub async fn health_check_url(
    connection_string: &str,
    connection_config: &ConnectionConfig,
    scan_config: &ScanConfig,
) -> Result<HealthReport> {
    scan_config.validate()?;
    let session = Session::connect(connection_string, connection_config)
        .await
        .map_err(|e| {
            tracing::error!(
                "Cannot open session for {}: {}",
                redact_database_url(connection_string),
                e
            );
            e
        })?;

    let report = health_check(&session, scan_config).await;
    session.close().await;
    Ok(report)
}

/// Description of the synthetic issue standing in for a failed detector.
pub fn failure_description(detector: Detector, error: &DbHealthError) -> String {
    format!("{}: {}", detector.failure_prefix(), error.detailed())
}
