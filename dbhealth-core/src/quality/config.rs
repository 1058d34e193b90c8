//! Scan configuration.

use serde::{Deserialize, Serialize};

use crate::error::DbHealthError;

/// Which tables to scan and which detectors to run.
///
/// # Example
/// ```rust
/// use dbhealth_core::quality::ScanConfig;
///
/// let config = ScanConfig::new()
///     .with_table_patterns(vec!["song%".to_string()])
///     .with_duplicates(false);
///
/// assert!(config.validate().is_ok());
/// assert!(config.check_nulls);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// SQL `LIKE` patterns; a table is scanned if it matches any. Empty means all tables.
    pub table_patterns: Vec<String>,
    /// Run the null detector
    pub check_nulls: bool,
    /// Run the orphan detector
    pub check_orphans: bool,
    /// Run the duplicate detector
    pub check_duplicates: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            table_patterns: Vec::new(),
            check_nulls: true,
            check_orphans: true,
            check_duplicates: true,
        }
    }
}

impl ScanConfig {
    /// Creates a scan config with every detector enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns a configuration error for empty or blank table patterns.
    pub fn validate(&self) -> crate::Result<()> {
        if self.table_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(DbHealthError::configuration(
                "table patterns must not be empty",
            ));
        }
        Ok(())
    }

    /// Restricts the scan to tables matching any LIKE pattern.
    pub fn with_table_patterns(mut self, patterns: Vec<String>) -> Self {
        self.table_patterns = patterns;
        self
    }

    /// Enables or disables the null detector.
    pub const fn with_nulls(mut self, enabled: bool) -> Self {
        self.check_nulls = enabled;
        self
    }

    /// Enables or disables the orphan detector.
    pub const fn with_orphans(mut self, enabled: bool) -> Self {
        self.check_orphans = enabled;
        self
    }

    /// Enables or disables the duplicate detector.
    pub const fn with_duplicates(mut self, enabled: bool) -> Self {
        self.check_duplicates = enabled;
        self
    }
}
