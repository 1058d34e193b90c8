//! Column-name heuristics and severity rules.
//!
//! All checks are literal, case-insensitive substring/suffix tests on the
//! column name. Data types are never consulted.

use crate::models::Severity;

/// Null percentages strictly above this are at least a warning.
pub const NULL_WARNING_THRESHOLD_PERCENT: f64 = 50.0;

/// True for columns whose nulls are worth reporting.
pub fn is_key_like(column: &str) -> bool {
    let name = column.to_lowercase();
    name.contains("id")
        || name.contains("key")
        || name == "isrc"
        || name.contains("email")
        || name.ends_with("_code")
        || name.ends_with("_number")
}

/// True for columns expected to hold distinct values.
pub fn is_unique_candidate(column: &str) -> bool {
    let name = column.to_lowercase();
    name == "isrc" || name.ends_with("_code") || name.ends_with("_number") || name.ends_with("_id")
}

/// Severity of nulls in a key-like column.
///
/// Identifier columns (names ending in `id`, and `isrc`) are always critical.
/// Anything else is a warning above the threshold, info otherwise.
pub fn classify_null_severity(column: &str, null_percent: f64) -> Severity {
    let name = column.to_lowercase();
    if name.ends_with("id") || name == "isrc" {
        Severity::Critical
    } else if null_percent > NULL_WARNING_THRESHOLD_PERCENT {
        Severity::Warning
    } else {
        Severity::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_like_columns() {
        for column in [
            "id",
            "artist_id",
            "ArtistID",
            "api_key",
            "keywords",
            "ISRC",
            "email",
            "backup_email_address",
            "label_code",
            "catalog_number",
            "valid",
            "video_url",
        ] {
            assert!(is_key_like(column), "{column} should be key-like");
        }
    }

    #[test]
    fn test_not_key_like_columns() {
        for column in ["title", "name", "codec", "number_of_plays", "created_at", "isrc2x"] {
            assert!(!is_key_like(column), "{column} should not be key-like");
        }
    }

    #[test]
    fn test_unique_candidates() {
        for column in ["isrc", "Label_Code", "catalog_number", "artist_id"] {
            assert!(is_unique_candidate(column), "{column} should be a candidate");
        }
        for column in ["id", "email", "valid", "api_key", "codes", "title"] {
            assert!(!is_unique_candidate(column), "{column} should not be a candidate");
        }
    }

    #[test]
    fn test_identifier_nulls_are_always_critical() {
        assert_eq!(classify_null_severity("id", 0.1), Severity::Critical);
        assert_eq!(classify_null_severity("track_id", 1.0), Severity::Critical);
        assert_eq!(classify_null_severity("ISRC", 33.3), Severity::Critical);
        // ends with "id" even without an underscore
        assert_eq!(classify_null_severity("valid", 10.0), Severity::Critical);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(classify_null_severity("email", 50.0), Severity::Info);
        assert_eq!(classify_null_severity("email", 50.1), Severity::Warning);
        assert_eq!(classify_null_severity("label_code", 100.0), Severity::Warning);
        assert_eq!(classify_null_severity("api_key", 0.5), Severity::Info);
    }

    #[test]
    fn test_id_inside_name_is_not_critical() {
        // contains "id" but does not end with it
        assert_eq!(classify_null_severity("video_url", 20.0), Severity::Info);
        assert_eq!(classify_null_severity("identity_hint", 75.0), Severity::Warning);
    }
}
