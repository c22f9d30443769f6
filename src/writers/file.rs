//! Columnar File Writer (spec §4.5): persists each Gold entity table as a
//! partitioned columnar file set using DuckDB's native `COPY ... (FORMAT
//! PARQUET, PARTITION_BY (...))`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::engine::AnalyticalEngine;
use crate::error::DestinationError;

pub struct FileWriter {
    output_dir: PathBuf,
}

impl FileWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Clear the directory before write so the destination is idempotent
    /// (spec §4.5: "the directory is cleared before write").
    fn clear_entity_dir(&self, entity: &str) -> Result<PathBuf, DestinationError> {
        let dir = self.output_dir.join(entity);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .map_err(|e| DestinationError::Io(format!("clearing {}: {e}", dir.display())))?;
        }
        std::fs::create_dir_all(&dir)
            .map_err(|e| DestinationError::Io(format!("creating {}: {e}", dir.display())))?;
        Ok(dir)
    }

    /// Copy `table` out to `<output_dir>/<entity>/` as partitioned Parquet.
    /// `partition_by` names the columns DuckDB should partition the output
    /// directory tree on; pass an empty slice for a flat, unpartitioned set.
    pub fn write_table(
        &self,
        engine: &AnalyticalEngine,
        table: &str,
        entity: &str,
        partition_by: &[&str],
    ) -> Result<(), DestinationError> {
        let dir = self.clear_entity_dir(entity)?;
        let partition_clause = if partition_by.is_empty() {
            String::new()
        } else {
            format!(", PARTITION_BY ({})", partition_by.join(", "))
        };
        let sql = format!(
            "COPY (SELECT * FROM {table}) TO '{}' (FORMAT PARQUET{partition_clause});",
            dir.display()
        );
        engine
            .execute_batch(&sql)
            .map_err(|e| DestinationError::Io(e.to_string()))?;
        Ok(())
    }

    /// Stage an in-memory row collection as a DuckDB table and write it out
    /// the same way as a silver table, then drop the staging table. The
    /// derived Gold entity kinds (states, counties, cities, ...) only ever
    /// exist as Rust vectors, never as tables in `engine`, so they need a
    /// landing table before `write_table`'s `COPY` can reach them. Mirrors
    /// the JSON-blob loading pattern `bronze::sources` uses for ingest.
    pub fn write_rows<T: Serialize>(
        &self,
        engine: &AnalyticalEngine,
        entity: &str,
        id_of: impl Fn(&T) -> String,
        rows: &[T],
    ) -> Result<usize, DestinationError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let table = format!("gold_{entity}");
        engine
            .execute_batch(&format!("CREATE TABLE {table} (id VARCHAR, data VARCHAR);"))
            .map_err(|e| DestinationError::Io(e.to_string()))?;
        for row in rows {
            let id = id_of(row);
            let data = serde_json::to_string(row)
                .map_err(|e| DestinationError::Io(format!("serializing {entity} row: {e}")))?;
            engine
                .execute_params(&format!("INSERT INTO {table} VALUES (?, ?)"), &[&id, &data])
                .map_err(|e| DestinationError::Io(e.to_string()))?;
        }
        self.write_table(engine, &table, entity, &[])?;
        engine
            .execute_batch(&format!("DROP TABLE {table};"))
            .map_err(|e| DestinationError::Io(e.to_string()))?;
        Ok(rows.len())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_entity_dir_recreates_an_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());
        let stale = dir.path().join("properties").join("stale.parquet");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"old").unwrap();

        let entity_dir = writer.clear_entity_dir("properties").unwrap();
        assert!(entity_dir.exists());
        assert!(!stale.exists());
    }

    #[test]
    fn writes_a_table_as_parquet() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        engine
            .execute_batch("CREATE TABLE properties (listing_id VARCHAR, price DOUBLE); INSERT INTO properties VALUES ('P1', 1.0);")
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());
        writer.write_table(&engine, "properties", "properties", &[]).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("properties")).unwrap().collect();
        assert!(!entries.is_empty());
    }

    #[derive(serde::Serialize)]
    struct Row {
        abbreviation: String,
    }

    #[test]
    fn write_rows_stages_and_drops_the_landing_table() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());
        let rows = vec![
            Row { abbreviation: "CA".to_string() },
            Row { abbreviation: "NY".to_string() },
        ];

        let written = writer
            .write_rows(&engine, "states", |r: &Row| r.abbreviation.clone(), &rows)
            .unwrap();

        assert_eq!(written, 2);
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("states")).unwrap().collect();
        assert!(!entries.is_empty());
        assert!(!engine.table_exists("gold_states").unwrap());
    }

    #[test]
    fn write_rows_skips_empty_collections() {
        let engine = AnalyticalEngine::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());

        let written = writer
            .write_rows(&engine, "states", |r: &Row| r.abbreviation.clone(), &[])
            .unwrap();

        assert_eq!(written, 0);
        assert!(!dir.path().join("states").exists());
    }
}
