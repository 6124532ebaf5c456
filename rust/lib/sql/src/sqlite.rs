use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode};
use tracing::warn;

use crate::error::SQLError;
use crate::traits::{Row, SQLExecutor, SQLStore, SQLTransaction, Value};

/// How long a writer waits on another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL lets readers proceed while a writer holds the lock.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        Self::configure(conn)
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, SQLError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Connection(e.to_string()))
    }
}

impl SQLExecutor for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        run_query(&*self.lock()?, sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        run_exec(&*self.lock()?, sql, params)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        let conn = self.lock()?;
        run_exec(&conn, sql, params)?;
        Ok(conn.last_insert_rowid())
    }
}

impl SQLStore for SqliteStore {
    fn begin(&self) -> Result<Box<dyn SQLTransaction + '_>, SQLError> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| classify(e, SQLError::Execution))?;
        Ok(Box::new(SqliteTransaction {
            conn,
            finished: false,
        }))
    }
}

/// A `BEGIN IMMEDIATE` transaction holding the store's connection.
struct SqliteTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    finished: bool,
}

impl SQLExecutor for SqliteTransaction<'_> {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        run_query(&self.conn, sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        run_exec(&self.conn, sql, params)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        run_exec(&self.conn, sql, params)?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl SQLTransaction for SqliteTransaction<'_> {
    fn commit(mut self: Box<Self>) -> Result<(), SQLError> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| classify(e, SQLError::Execution))?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!("rollback failed: {}", e);
        }
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        bound.iter().map(|b| b.as_ref()).collect();

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            let mut columns = Vec::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                columns.push((name.clone(), row_value_at(row, i)));
            }
            Ok(Row { columns })
        })
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
    }
    Ok(result)
}

fn run_exec(conn: &Connection, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        bound.iter().map(|b| b.as_ref()).collect();

    let affected = conn
        .execute(sql, param_refs.as_slice())
        .map_err(|e| classify(e, SQLError::Execution))?;

    Ok(affected as u64)
}

/// Map a rusqlite error, singling out constraint failures.
fn classify(err: rusqlite::Error, otherwise: fn(String) -> SQLError) -> SQLError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            SQLError::Constraint(err.to_string())
        }
        _ => otherwise(err.to_string()),
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> Value {
    match row.get_ref(idx) {
        Ok(ValueRef::Integer(i)) => Value::Integer(i),
        Ok(ValueRef::Real(f)) => Value::Real(f),
        Ok(ValueRef::Text(t)) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        Ok(ValueRef::Blob(b)) => Value::Blob(b.to_vec()),
        Ok(ValueRef::Null) | Err(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_table() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec(
                "CREATE TABLE items (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT UNIQUE,
                    weight REAL
                )",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn insert_returns_rowid() {
        let store = store_with_table();
        let a = store
            .insert("INSERT INTO items (name, weight) VALUES (?1, ?2)", &["a".into(), 1.5.into()])
            .unwrap();
        let b = store
            .insert("INSERT INTO items (name, weight) VALUES (?1, ?2)", &["b".into(), Value::Null])
            .unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        let rows = store.query("SELECT * FROM items ORDER BY id", &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_str("name"), Some("a"));
        assert_eq!(rows[0].get_f64("weight"), Some(1.5));
        assert_eq!(rows[1].get("weight"), Some(&Value::Null));
        assert_eq!(rows[1].get_f64("weight"), None);
    }

    #[test]
    fn unique_violation_is_constraint_error() {
        let store = store_with_table();
        store
            .exec("INSERT INTO items (name) VALUES (?1)", &["dup".into()])
            .unwrap();
        let err = store
            .exec("INSERT INTO items (name) VALUES (?1)", &["dup".into()])
            .unwrap_err();
        assert!(err.is_constraint(), "got {:?}", err);
    }

    #[test]
    fn syntax_error_is_not_constraint() {
        let store = store_with_table();
        let err = store.exec("INSERT INTO nowhere VALUES (1)", &[]).unwrap_err();
        assert!(!err.is_constraint());
    }

    #[test]
    fn transaction_commit_persists() {
        let store = store_with_table();
        let tx = store.begin().unwrap();
        tx.insert("INSERT INTO items (name) VALUES (?1)", &["x".into()]).unwrap();
        let inside = tx.query("SELECT COUNT(*) AS cnt FROM items", &[]).unwrap();
        assert_eq!(inside[0].get_i64("cnt"), Some(1));
        tx.commit().unwrap();

        let rows = store.query("SELECT COUNT(*) AS cnt FROM items", &[]).unwrap();
        assert_eq!(rows[0].get_i64("cnt"), Some(1));
    }

    #[test]
    fn transaction_drop_rolls_back() {
        let store = store_with_table();
        {
            let tx = store.begin().unwrap();
            tx.insert("INSERT INTO items (name) VALUES (?1)", &["x".into()]).unwrap();
        }
        let rows = store.query("SELECT COUNT(*) AS cnt FROM items", &[]).unwrap();
        assert_eq!(rows[0].get_i64("cnt"), Some(0));

        // The connection is usable again after the rollback.
        let tx = store.begin().unwrap();
        tx.insert("INSERT INTO items (name) VALUES (?1)", &["y".into()]).unwrap();
        tx.commit().unwrap();
    }

    #[test]
    fn file_store_shared_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.sqlite");
        let first = SqliteStore::open(&path).unwrap();
        first
            .exec("CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .unwrap();
        let second = SqliteStore::open(&path).unwrap();

        let tx = first.begin().unwrap();
        tx.insert("INSERT INTO items (name) VALUES ('a')", &[]).unwrap();
        tx.commit().unwrap();

        let rows = second.query("SELECT name FROM items", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("name"), Some("a"));
    }

    #[test]
    fn option_values_bind_as_null() {
        let store = store_with_table();
        let none: Option<f64> = None;
        store
            .exec(
                "INSERT INTO items (name, weight) VALUES (?1, ?2)",
                &[Some("opt").into(), none.into()],
            )
            .unwrap();
        let rows = store
            .query("SELECT weight FROM items WHERE name = ?1", &["opt".into()])
            .unwrap();
        assert_eq!(rows[0].get("weight"), Some(&Value::Null));
    }
}
