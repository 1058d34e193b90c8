//! Backend-specific SQL text helpers.
//!
//! Names that come from the catalog are interpolated into probe queries, so
//! they are always quoted here first. Values (patterns, table names used in
//! catalog lookups) are bound as parameters instead.

use crate::models::DatabaseType;

/// Quotes an identifier for the given backend, doubling embedded quotes.
pub fn quote_identifier(database_type: DatabaseType, name: &str) -> String {
    let quote = match database_type {
        DatabaseType::MySQL => '`',
        DatabaseType::PostgreSQL | DatabaseType::SQLite => '"',
    };
    let mut quoted = String::with_capacity(name.len().saturating_add(2));
    quoted.push(quote);
    for ch in name.chars() {
        if ch == quote {
            quoted.push(quote);
        }
        quoted.push(ch);
    }
    quoted.push(quote);
    quoted
}

/// Placeholder for the `index`-th (1-based) bound parameter.
pub fn placeholder(database_type: DatabaseType, index: usize) -> String {
    match database_type {
        DatabaseType::PostgreSQL => format!("${index}"),
        DatabaseType::MySQL | DatabaseType::SQLite => "?".to_string(),
    }
}

/// `column LIKE p1 OR column LIKE p2 ...` over `count` placeholders
/// starting at `first_index`.
pub fn like_any(database_type: DatabaseType, column: &str, first_index: usize, count: usize) -> String {
    (0..count)
        .map(|offset| {
            format!(
                "{column} LIKE {}",
                placeholder(database_type, first_index.saturating_add(offset))
            )
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_postgres() {
        assert_eq!(quote_identifier(DatabaseType::PostgreSQL, "songs"), "\"songs\"");
        assert_eq!(
            quote_identifier(DatabaseType::PostgreSQL, "odd\"name"),
            "\"odd\"\"name\""
        );
    }

    #[test]
    fn test_quote_identifier_mysql() {
        assert_eq!(quote_identifier(DatabaseType::MySQL, "songs"), "`songs`");
        assert_eq!(quote_identifier(DatabaseType::MySQL, "a`b"), "`a``b`");
    }

    #[test]
    fn test_quote_identifier_sqlite_with_spaces() {
        assert_eq!(
            quote_identifier(DatabaseType::SQLite, "order items"),
            "\"order items\""
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholder(DatabaseType::PostgreSQL, 3), "$3");
        assert_eq!(placeholder(DatabaseType::MySQL, 3), "?");
        assert_eq!(placeholder(DatabaseType::SQLite, 1), "?");
    }

    #[test]
    fn test_like_any() {
        assert_eq!(
            like_any(DatabaseType::PostgreSQL, "table_name", 1, 2),
            "table_name LIKE $1 OR table_name LIKE $2"
        );
        assert_eq!(
            like_any(DatabaseType::SQLite, "name", 1, 2),
            "name LIKE ? OR name LIKE ?"
        );
        assert_eq!(like_any(DatabaseType::SQLite, "name", 1, 0), "");
    }
}
