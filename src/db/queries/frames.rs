//! Frame record queries.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{FrameRecord, NewFrame};
use crate::Result;

/// Expects columns in order: frame_id, frame_url, camera_width, camera_height, created_at.
fn parse_frame_row(row: &rusqlite::Row) -> rusqlite::Result<FrameRecord> {
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(FrameRecord {
        frame_id: row.get(0)?,
        frame_url: row.get(1)?,
        camera_width: row.get(2)?,
        camera_height: row.get(3)?,
        created_at,
    })
}

/// Insert a frame and return the stored record with its assigned id.
pub fn insert_frame(conn: &Connection, frame: &NewFrame) -> Result<FrameRecord> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO frames (frame_url, camera_width, camera_height, created_at)
         VALUES (:frame_url, :camera_width, :camera_height, :created_at)",
        rusqlite::named_params! {
            ":frame_url": &frame.frame_url,
            ":camera_width": frame.camera_size.width(),
            ":camera_height": frame.camera_size.height(),
            ":created_at": created_at.to_rfc3339(),
        },
    )?;

    Ok(FrameRecord {
        frame_id: conn.last_insert_rowid(),
        frame_url: frame.frame_url.clone(),
        camera_width: frame.camera_size.width(),
        camera_height: frame.camera_size.height(),
        created_at,
    })
}

/// `Ok(None)` when no frame has this id.
pub fn get_frame(conn: &Connection, frame_id: i64) -> Result<Option<FrameRecord>> {
    let frame = conn
        .query_row(
            "SELECT frame_id, frame_url, camera_width, camera_height, created_at
             FROM frames WHERE frame_id = :frame_id",
            rusqlite::named_params! { ":frame_id": frame_id },
            parse_frame_row,
        )
        .optional()?;

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::CameraSize;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn count_frames(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM frames", [], |row| row.get(0))
            .unwrap()
    }

    fn new_frame(key: &str, width: u32, height: u32) -> NewFrame {
        NewFrame {
            frame_url: key.to_string(),
            camera_size: CameraSize::new(width, height).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_get_frame() {
        let conn = setup();

        let inserted = insert_frame(&conn, &new_frame("frame_1.jpg", 1080, 1920)).unwrap();
        assert!(inserted.frame_id > 0);

        let fetched = get_frame(&conn, inserted.frame_id).unwrap().unwrap();
        assert_eq!(fetched.frame_url, "frame_1.jpg");
        assert_eq!(fetched.camera_width, 1080);
        assert_eq!(fetched.camera_height, 1920);
        assert_eq!(
            fetched.created_at.timestamp(),
            inserted.created_at.timestamp()
        );
    }

    #[test]
    fn test_ids_are_distinct() {
        let conn = setup();

        let a = insert_frame(&conn, &new_frame("a.jpg", 1, 1)).unwrap();
        let b = insert_frame(&conn, &new_frame("b.jpg", 1, 1)).unwrap();

        assert_ne!(a.frame_id, b.frame_id);
        assert_eq!(count_frames(&conn), 2);
    }

    #[test]
    fn test_get_missing_frame() {
        let conn = setup();
        assert!(get_frame(&conn, 999).unwrap().is_none());
    }
}
