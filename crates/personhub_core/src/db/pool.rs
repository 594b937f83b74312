//! Pooled SQLite access.
//!
//! # Responsibility
//! - Build an `r2d2` pool over `r2d2_sqlite` for a file or in-memory database.
//! - Configure every pooled connection (busy timeout, foreign keys).
//! - Run file-level setup (WAL journaling, migrations) once per pool build.
//!
//! # Invariants
//! - No connection is handed out before migrations succeed.
//! - In-memory pools hold exactly one connection that never expires, so all
//!   callers share one database.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{debug, error, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long `DbPool::get` waits for a free connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Scoped pool checkout; the connection goes back to the pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Cloneable handle to a shared connection pool.
#[derive(Clone)]
pub struct DbPool {
    pool: Pool<SqliteConnectionManager>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    File,
    Memory,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl DbPool {
    /// Opens a file-backed pool with the default acquire timeout.
    pub fn open(path: impl AsRef<Path>, max_size: u32) -> DbResult<Self> {
        Self::open_with_timeout(path, max_size, DEFAULT_ACQUIRE_TIMEOUT)
    }

    /// Opens a file-backed pool of at most `max_size` connections.
    ///
    /// One connection is opened while building so bootstrap errors surface
    /// here; the rest are opened on demand.
    ///
    /// # Side effects
    /// - Switches the file to WAL journaling so readers do not block writers.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open_with_timeout(
        path: impl AsRef<Path>,
        max_size: u32,
        acquire_timeout: Duration,
    ) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(configure_connection);
        let builder = Pool::builder()
            .max_size(max_size.max(1))
            .min_idle(Some(1))
            .connection_timeout(acquire_timeout);

        Self::build(builder, manager, Mode::File)
    }

    /// Opens a single-connection pool over a fresh in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let manager = SqliteConnectionManager::memory().with_init(configure_connection);
        // Dropping the only connection would drop the database with it.
        let builder = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(DEFAULT_ACQUIRE_TIMEOUT);

        Self::build(builder, manager, Mode::Memory)
    }

    fn build(
        builder: r2d2::Builder<SqliteConnectionManager>,
        manager: SqliteConnectionManager,
        mode: Mode,
    ) -> DbResult<Self> {
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode={}", mode.as_str());

        let result: DbResult<Self> = builder
            .build(manager)
            .map_err(DbError::from)
            .and_then(|pool| {
                let mut conn = pool.get()?;
                bootstrap_database(&mut conn, mode)?;
                Ok(Self { pool })
            });

        match &result {
            Ok(_) => info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    pub fn max_size(&self) -> u32 {
        self.pool.max_size()
    }

    /// Returns `(open, idle)` connection counts.
    pub fn status(&self) -> (u32, u32) {
        let state = self.pool.state();
        (state.connections, state.idle_connections)
    }

    /// Acquires a connection, blocking up to the acquire timeout.
    ///
    /// # Errors
    /// - `DbError::Pool` when every connection stays busy or a new connection
    ///   cannot be opened in time.
    pub fn get(&self) -> DbResult<PooledConnection> {
        Ok(self.pool.get()?)
    }
}

fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    // Busy timeout first: sibling connections may be writing already.
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

fn bootstrap_database(conn: &mut Connection, mode: Mode) -> DbResult<()> {
    if mode == Mode::File {
        // journal_mode reports the resulting mode as a row.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    }
    let version = apply_migrations(conn)?;
    debug!("event=db_schema module=db status=ok version={version}");
    Ok(())
}
