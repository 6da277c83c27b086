//! Frame persistence
//!
//! Frame records live in SQLite behind an r2d2 pool. Handlers reach the store
//! through [`FrameRepository`] so tests can swap in [`MockFrameRepository`].

pub mod migrations;
pub mod mock;
pub mod pool;
pub mod queries;

pub use mock::MockFrameRepository;
pub use pool::DbPool;

use crate::models::{FrameRecord, NewFrame};
use crate::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait FrameRepository: Send + Sync {
    async fn create(&self, frame: NewFrame) -> Result<FrameRecord>;

    /// `Ok(None)` means the id is unknown; `Err` means the store failed.
    async fn get_by_id(&self, frame_id: i64) -> Result<Option<FrameRecord>>;
}

pub struct SqliteFrameRepository {
    pool: DbPool,
}

impl SqliteFrameRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
    {
        let db_pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool::get_conn(&db_pool)?;
            f(&*conn)
        })
        .await
        .map_err(|e| Error::Invariant(format!("Database task join error: {}", e)))?
    }
}

#[async_trait]
impl FrameRepository for SqliteFrameRepository {
    async fn create(&self, frame: NewFrame) -> Result<FrameRecord> {
        self.with_conn(move |conn| queries::frames::insert_frame(conn, &frame))
            .await
    }

    async fn get_by_id(&self, frame_id: i64) -> Result<Option<FrameRecord>> {
        self.with_conn(move |conn| queries::frames::get_frame(conn, frame_id))
            .await
    }
}
