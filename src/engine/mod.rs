//! The analytical engine: a thin session wrapper over a single embedded
//! DuckDB connection.
//!
//! Grounded on the teacher's `database::duckdb::DuckDBBackend`: one
//! `Mutex`-guarded `duckdb::Connection`, `execute`/`execute_batch` helpers,
//! and a `ValueRef` -> `serde_json::Value` bridge for reading rows back out
//! generically. Every Bronze/Silver/Gold table is a real table in this
//! connection; the engine owns all of them for the lifetime of one run and
//! drops them at session end (dropping the connection is enough: DuckDB
//! tables in an in-memory database do not outlive the connection).

use std::sync::Mutex;

use serde_json::Value;

use crate::error::EngineError;

mod convert;

pub use convert::row_to_json;

/// A single-connection DuckDB session used as the in-process analytical
/// execution layer for one pipeline run.
pub struct AnalyticalEngine {
    connection: Mutex<duckdb::Connection>,
}

impl AnalyticalEngine {
    /// Open an in-memory analytical engine. Every pipeline run gets a fresh
    /// one: there is no cross-run state (§3 Ownership).
    pub fn in_memory() -> Result<Self, EngineError> {
        let connection = duckdb::Connection::open_in_memory()
            .map_err(|e| EngineError::Connect(e.to_string()))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, duckdb::Connection>, EngineError> {
        self.connection.lock().map_err(|_| EngineError::LockPoisoned)
    }

    /// Execute a statement that does not return rows.
    pub fn execute(&self, sql: &str) -> Result<usize, EngineError> {
        let conn = self.lock()?;
        conn.execute(sql, []).map_err(EngineError::from)
    }

    /// Execute a statement with positional `?` parameters, avoiding manual
    /// string escaping for row inserts.
    pub fn execute_params(
        &self,
        sql: &str,
        params: &[&dyn duckdb::ToSql],
    ) -> Result<usize, EngineError> {
        let conn = self.lock()?;
        conn.execute(sql, params).map_err(EngineError::from)
    }

    /// Execute a batch of semicolon-separated statements.
    pub fn execute_batch(&self, sql: &str) -> Result<(), EngineError> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(EngineError::from)
    }

    /// Run a query and materialize every row as a JSON object keyed by
    /// column name. Intended for moderate result sets (a tier's worth of
    /// rows); the writers stream in batches rather than loading an entire
    /// table at once.
    pub fn query_json(&self, sql: &str) -> Result<Vec<Value>, EngineError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(EngineError::from)?;
        let mut rows = stmt.query([]).map_err(EngineError::from)?;

        let column_count = rows.as_ref().map(|r| r.column_count()).unwrap_or(0);
        let columns: Vec<String> = (0..column_count)
            .map(|i| {
                rows.as_ref()
                    .and_then(|r| r.column_name(i).ok())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("col{i}"))
            })
            .collect();

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(EngineError::from)? {
            out.push(row_to_json(row, &columns));
        }
        Ok(out)
    }

    /// Run a query in batches of `batch_size` rows, invoking `on_batch` for
    /// each batch. Used by writers so a large Gold table never needs to be
    /// materialized in memory all at once.
    pub fn query_json_batched<F>(
        &self,
        sql: &str,
        batch_size: usize,
        mut on_batch: F,
    ) -> Result<(), EngineError>
    where
        F: FnMut(Vec<Value>) -> Result<(), EngineError>,
    {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(EngineError::from)?;
        let mut rows = stmt.query([]).map_err(EngineError::from)?;

        let column_count = rows.as_ref().map(|r| r.column_count()).unwrap_or(0);
        let columns: Vec<String> = (0..column_count)
            .map(|i| {
                rows.as_ref()
                    .and_then(|r| r.column_name(i).ok())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("col{i}"))
            })
            .collect();

        let mut batch = Vec::with_capacity(batch_size);
        while let Some(row) = rows.next().map_err(EngineError::from)? {
            batch.push(row_to_json(row, &columns));
            if batch.len() == batch_size {
                on_batch(std::mem::take(&mut batch))?;
            }
        }
        if !batch.is_empty() {
            on_batch(batch)?;
        }
        Ok(())
    }

    /// Count the rows in a table (used for the final run report).
    pub fn count(&self, table: &str) -> Result<usize, EngineError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT count(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(EngineError::from)?;
        Ok(count as usize)
    }

    /// Whether a table currently exists in the session.
    pub fn table_exists(&self, table: &str) -> Result<bool, EngineError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
                [table],
                |row| row.get(0),
            )
            .map_err(EngineError::from)?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_simple_table() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        engine
            .execute_batch(
                "CREATE TABLE t (id INTEGER, name VARCHAR); \
                 INSERT INTO t VALUES (1, 'a'), (2, 'b');",
            )
            .unwrap();
        assert!(engine.table_exists("t").unwrap());
        assert_eq!(engine.count("t").unwrap(), 2);

        let rows = engine.query_json("SELECT * FROM t ORDER BY id").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], Value::String("a".to_string()));
    }

    #[test]
    fn batches_large_queries() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        engine
            .execute("CREATE TABLE nums AS SELECT range AS n FROM range(10)")
            .unwrap();

        let mut seen = Vec::new();
        engine
            .query_json_batched("SELECT n FROM nums ORDER BY n", 3, |batch| {
                seen.push(batch.len());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![3, 3, 3, 1]);
    }
}
