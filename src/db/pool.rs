//! SQLite connection pooling with r2d2.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::time::Duration;

use super::migrations;
use crate::{Error, Result};

pub type DbPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open (creating if needed) the database at `db_path` and run pending
/// migrations.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));

    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::Database(format!("Failed to create connection pool: {}", e)))?;

    migrate(&pool)?;
    Ok(pool)
}

/// In-memory database for tests and dry runs.
///
/// Every SQLite `:memory:` connection is its own database, so the pool holds
/// exactly one connection.
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory();

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Error::Database(format!("Failed to create in-memory pool: {}", e)))?;

    migrate(&pool)?;
    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    Ok(pool.get()?)
}

fn migrate(pool: &DbPool) -> Result<()> {
    let conn = get_conn(pool)?;
    migrations::run_migrations(&conn)?;
    Ok(())
}
