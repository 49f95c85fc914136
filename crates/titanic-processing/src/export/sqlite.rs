use super::{CellColumn, TableExporter, ensure_parent_dir, export_error};
use crate::error::Result;
use crate::utils::{is_integer_dtype, is_numeric_dtype};
use polars::prelude::*;
use rusqlite::Connection;
use rusqlite::types::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes the table into a SQLite file, replacing any table of the same name.
#[derive(Debug, Clone)]
pub struct SqliteExporter {
    path: PathBuf,
    table_name: String,
}

impl SqliteExporter {
    pub fn new(path: impl Into<PathBuf>, table_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table_name: table_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, df: &DataFrame) -> Result<()> {
        ensure_parent_dir(&self.path)?;

        let cells: Vec<Vec<Value>> = df
            .get_columns()
            .iter()
            .map(|col| CellColumn::from_series(col.as_materialized_series()).map(sql_values))
            .collect::<Result<_>>()?;

        let table = quote_identifier(&self.table_name);
        let definitions = df
            .get_columns()
            .iter()
            .map(|col| format!("{} {}", quote_identifier(col.name()), column_affinity(col.dtype())))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; df.width()].join(", ");

        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
        tx.execute(&format!("CREATE TABLE {table} ({definitions})"), [])?;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;
            for row in 0..df.height() {
                stmt.execute(rusqlite::params_from_iter(cells.iter().map(|col| &col[row])))?;
            }
        }
        tx.commit()?;

        debug!(
            "Wrote {} rows into table {} of {}",
            df.height(),
            table,
            self.path.display()
        );
        Ok(())
    }
}

impl TableExporter for SqliteExporter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn export(&self, df: &DataFrame) -> Result<PathBuf> {
        self.write(df)
            .map_err(|e| export_error(self.name(), &self.path, e))?;
        Ok(self.path.clone())
    }
}

/// SQLite column affinity for a polars dtype.
fn column_affinity(dtype: &DataType) -> &'static str {
    if is_integer_dtype(dtype) || dtype == &DataType::Boolean {
        "INTEGER"
    } else if is_numeric_dtype(dtype) {
        "REAL"
    } else {
        "TEXT"
    }
}

fn sql_values(column: CellColumn) -> Vec<Value> {
    match column {
        CellColumn::Integer(values) => values
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Integer))
            .collect(),
        CellColumn::Real(values) => values
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Real))
            .collect(),
        CellColumn::Text(values) => values
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Text))
            .collect(),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
