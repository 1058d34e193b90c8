//! Report data model: issues, severities and the aggregated health report.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostgreSQL => write!(f, "PostgreSQL"),
            Self::MySQL => write!(f, "MySQL"),
            Self::SQLite => write!(f, "SQLite"),
        }
    }
}

/// How urgent a finding is.
///
/// Declaration order is the report order: critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// All severities in report order.
    pub const ALL: [Self; 3] = [Self::Critical, Self::Warning, Self::Info];

    /// Lowercase name used in summaries and rendered output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of problem a [`QualityIssue`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Nulls,
    Orphans,
    Duplicates,
    /// A detector could not run at all.
    Error,
}

impl IssueType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nulls => "nulls",
            Self::Orphans => "orphans",
            Self::Duplicates => "duplicates",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of `count` in `total`, 0.0 when `total` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// A single data-quality finding.
///
/// `percent` is always derived from `count` and `total`. Synthetic `error`
/// issues carry an empty table and column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityIssue {
    table: String,
    column: String,
    issue_type: IssueType,
    count: u64,
    total: u64,
    percent: f64,
    severity: Severity,
    description: String,
}

impl QualityIssue {
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        issue_type: IssueType,
        count: u64,
        total: u64,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            issue_type,
            count,
            total,
            percent: percent_of(count, total),
            severity,
            description: description.into(),
        }
    }

    /// A critical `error` issue standing in for a detector that failed.
    pub fn scan_failure(description: impl Into<String>) -> Self {
        Self::new(
            String::new(),
            String::new(),
            IssueType::Error,
            0,
            0,
            Severity::Critical,
            description,
        )
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub const fn count(&self) -> u64 {
        self.count
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn percent(&self) -> f64 {
        self.percent
    }

    pub const fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Report order: severity, then table, then column.
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.severity
            .cmp(&other.severity)
            .then_with(|| self.table.cmp(&other.table))
            .then_with(|| self.column.cmp(&other.column))
    }
}

/// Issue counts per severity. Every severity is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeveritySummary {
    pub fn from_issues(issues: &[QualityIssue]) -> Self {
        issues.iter().fold(Self::default(), |mut summary, issue| {
            let slot = summary.slot_mut(issue.severity());
            *slot = slot.saturating_add(1);
            summary
        })
    }

    pub const fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }

    pub const fn total(&self) -> usize {
        self.critical
            .saturating_add(self.warning)
            .saturating_add(self.info)
    }

    const fn slot_mut(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::Warning => &mut self.warning,
            Severity::Info => &mut self.info,
        }
    }
}

/// Aggregated outcome of one health check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    all_good: bool,
    total_issues: usize,
    summary: SeveritySummary,
    scan_time_ms: u64,
    #[serde(rename = "issues")]
    issues_by_severity: Vec<QualityIssue>,
}

impl HealthReport {
    /// Builds a report, sorting issues into report order.
    ///
    /// The sort is stable, so issues with equal keys keep detector order.
    pub fn from_issues(mut issues: Vec<QualityIssue>, scan_time: Duration) -> Self {
        issues.sort_by(QualityIssue::report_order);
        let summary = SeveritySummary::from_issues(&issues);
        Self {
            all_good: issues.is_empty(),
            total_issues: issues.len(),
            summary,
            scan_time_ms: u64::try_from(scan_time.as_millis()).unwrap_or(u64::MAX),
            issues_by_severity: issues,
        }
    }

    pub const fn all_good(&self) -> bool {
        self.all_good
    }

    pub const fn total_issues(&self) -> usize {
        self.total_issues
    }

    /// Issues in report order.
    pub fn issues_by_severity(&self) -> &[QualityIssue] {
        &self.issues_by_severity
    }

    pub const fn summary(&self) -> &SeveritySummary {
        &self.summary
    }

    pub const fn scan_time_ms(&self) -> u64 {
        self.scan_time_ms
    }

    pub const fn has_critical(&self) -> bool {
        self.summary.critical > 0
    }

    pub const fn has_warnings(&self) -> bool {
        self.summary.warning > 0
    }

    /// Process exit code for this report.
    ///
    /// 2 when any critical issue exists, 1 for warnings in strict mode,
    /// otherwise 0.
    pub const fn exit_code(&self, strict: bool) -> u8 {
        if self.has_critical() {
            2
        } else if strict && self.has_warnings() {
            1
        } else {
            0
        }
    }

    pub fn into_issues(self) -> Vec<QualityIssue> {
        self.issues_by_severity
    }
}
