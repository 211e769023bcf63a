//! Shared SQLite plumbing for the cache and the library store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{RecipeSenseError, Result};

/// Connection shared between the cache and the stores
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Open (or create) the database at `db_path`; `:memory:` for tests
pub fn open(db_path: &str) -> Result<SharedConnection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub(crate) fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| RecipeSenseError::Other("database connection lock poisoned".to_string()))
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically
pub(crate) fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_roundtrip_and_order() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::milliseconds(1500);

        let a = format_timestamp(earlier);
        let b = format_timestamp(later);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert!(parse_timestamp(&a).is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_open_memory() {
        let conn = open(":memory:").unwrap();
        let guard = lock(&conn).unwrap();
        let one: i64 = guard.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, 1);
    }
}
