//! Schema versions for the frame store.
//!
//! Each entry is applied once, inside its own transaction, and recorded in
//! `schema_migrations`. Entries must stay sorted by version.

use rusqlite::{params, Connection};

use crate::{Error, Result};

const SCHEMA: &[(u32, &str, &str)] = &[(1, "frames", include_str!("001_frames.sql"))];

const BOOKKEEPING: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Bring `conn` up to the newest schema and return how many versions were
/// applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    conn.execute_batch(BOOKKEEPING)?;

    let applied: u32 = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get::<_, Option<u32>>(0)
        })?
        .unwrap_or(0);

    let pending: Vec<_> = SCHEMA.iter().filter(|(v, _, _)| *v > applied).collect();

    for (version, name, sql) in &pending {
        let failed = |e: rusqlite::Error| {
            Error::Database(format!("Schema version {} ({}) failed: {}", version, name, e))
        };

        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        tracing::info!("Applied schema version {}: {}", version, name);
    }

    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded_versions(conn: &Connection) -> Vec<u32> {
        let mut stmt = conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_run_migrations_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), SCHEMA.len());
        assert_eq!(run_migrations(&conn).unwrap(), 0);

        let expected: Vec<u32> = SCHEMA.iter().map(|(v, _, _)| *v).collect();
        assert_eq!(recorded_versions(&conn), expected);
    }

    #[test]
    fn test_frames_table_constraints() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let empty_url = conn.execute(
            "INSERT INTO frames (frame_url, camera_width, camera_height, created_at)
             VALUES ('', 10, 10, '2025-01-01T00:00:00Z')",
            [],
        );
        assert!(empty_url.is_err());

        let zero_width = conn.execute(
            "INSERT INTO frames (frame_url, camera_width, camera_height, created_at)
             VALUES ('frame.jpg', 0, 10, '2025-01-01T00:00:00Z')",
            [],
        );
        assert!(zero_width.is_err());
    }
}
