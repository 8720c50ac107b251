//! Shared SQLite handle.
//!
//! One connection per `DbPool`, serialized through a mutex. Cloning is cheap
//! and clones share the connection. Separate pools opened on the same file
//! coordinate through SQLite's own locking (WAL plus a busy timeout).

use crate::db::initialize::init_db;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DbPool {
    conn: Arc<Mutex<Connection>>,
}

impl DbPool {
    /// Open (or create) the database file without touching the schema.
    pub fn new(path: &str) -> AppResult<Self> {
        let path = Path::new(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database and bring the schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = Self::new(path)?;
        pool.with_conn(|conn| init_db(conn))?;
        Ok(pool)
    }

    /// Fully migrated in-memory database.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        init_db(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `func` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| AppError::LockPoisoned)?;
        func(&mut conn)
    }

    /// Run `func` inside one transaction, committed only when it returns `Ok`.
    pub fn with_tx<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let out = func(&tx)?;
            tx.commit()?;
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_tables(pool: &DbPool) -> i64 {
        pool.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'processed_punches'",
                [],
                |r| r.get(0),
            )?)
        })
        .unwrap()
    }

    #[test]
    fn test_open_in_memory_is_migrated() {
        let pool = DbPool::open_in_memory().unwrap();
        assert_eq!(count_tables(&pool), 1);
    }

    #[test]
    fn test_open_file_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pc.sqlite");
        let pool = DbPool::open(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
        assert_eq!(count_tables(&pool), 1);
    }

    #[test]
    fn test_clones_share_connection() {
        let pool = DbPool::open_in_memory().unwrap();
        let other = pool.clone();
        pool.with_conn(|conn| {
            conn.execute(
                "INSERT INTO employees (name, registration, active, created_at)
                 VALUES ('Ana', '0042', 1, '2025-01-01T00:00:00+00:00')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let n: i64 = other
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM employees", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_with_tx_rolls_back_on_error() {
        let pool = DbPool::open_in_memory().unwrap();
        let res: AppResult<()> = pool.with_tx(|conn| {
            conn.execute(
                "INSERT INTO employees (name, registration, active, created_at)
                 VALUES ('Ana', '0042', 1, '2025-01-01T00:00:00+00:00')",
                [],
            )?;
            conn.execute("INSERT INTO no_such_table VALUES (1)", [])?;
            Ok(())
        });
        assert!(res.is_err());

        let n: i64 = pool
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM employees", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(n, 0);
    }
}
