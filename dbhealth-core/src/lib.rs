//! Core engine for dbhealth: data-quality health checks for relational databases.
//!
//! Given a database session, the engine discovers tables through the catalog,
//! runs three detectors (nulls in key-like columns, orphaned foreign keys and
//! duplicate values in unique-candidate columns) and aggregates the findings
//! into a deterministic [`HealthReport`].
//!
//! # Guarantees
//! - All probes are read-only COUNT queries; sessions are opened read-only
//! - Connection strings are redacted before they reach logs or errors
//! - A health check never fails once a session exists: detector failures are
//!   reported as critical `error` issues
//!
//! # Architecture
//! - [`connection`]: lazy `sqlx` Any sessions with per-backend session settings
//! - [`catalog`]: information-schema introspection with SQLite catalog fallback
//! - [`quality`]: the classifier, the detectors and the health check
//! - [`models`]: issues, severities and the report

pub mod catalog;
pub mod connection;
pub mod error;
pub mod logging;
pub mod models;
pub mod quality;

// Re-export commonly used types
pub use catalog::{CatalogIntrospector, ColumnInfo, ForeignKeyRef};
pub use connection::{ConnectionConfig, Session};
pub use error::{DbHealthError, Result};
pub use models::{DatabaseType, HealthReport, IssueType, QualityIssue, Severity, SeveritySummary};
pub use quality::{HealthChecker, ScanConfig, health_check, health_check_url};
