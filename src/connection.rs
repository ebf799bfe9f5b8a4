//! DuckDB connection wrapper holding the record table and query execution.
//!
//! The validated records of the last fetch are loaded into an in-memory
//! `sales` table, which backs the record explorer and raw SQL access.

use crate::cache::CacheManager;
use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{RecordRow, SalesRecord};
use chrono::NaiveDate;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use tempfile::NamedTempFile;

/// Column layout of the `sales` table, in [`RecordRow`] field order.
pub const SALES_COLUMNS: [(&str, &str); 8] = [
    ("product", "VARCHAR"),
    ("category", "VARCHAR"),
    ("price", "DOUBLE"),
    ("purchase_date", "VARCHAR"),
    ("seller", "VARCHAR"),
    ("state", "VARCHAR"),
    ("latitude", "DOUBLE"),
    ("longitude", "DOUBLE"),
];

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Wraps a DuckDB connection and the response cache feeding it.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to fetch/locate sales responses.
    pub cache: RefCell<CacheManager>,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Replace the `sales` table with `records`.
    ///
    /// Records are streamed to DuckDB through a newline-delimited JSON temp
    /// file read with an explicit schema, so an empty batch still produces
    /// a typed, empty table.
    pub fn load_records(&self, records: &[SalesRecord]) -> Result<()> {
        let table = config::SALES_TABLE;
        let schema = SALES_COLUMNS
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn
            .execute_batch(&format!("CREATE OR REPLACE TABLE {} ({})", table, schema))?;

        if !records.is_empty() {
            let mut file = NamedTempFile::new()?;
            for record in records {
                serde_json::to_writer(&mut file, &RecordRow::from(record))?;
                writeln!(file)?;
            }
            file.flush()?;

            let path_fwd = file.path().to_string_lossy().replace('\\', "/");
            let columns = SALES_COLUMNS
                .iter()
                .map(|(name, ty)| format!("{}: '{}'", name, ty))
                .collect::<Vec<_>>()
                .join(", ");
            self.conn.execute_batch(&format!(
                "INSERT INTO {} SELECT * FROM read_json('{}', \
                 format='newline_delimited', columns={{{}}})",
                table, path_fwd, columns
            ))?;
        }

        self.registered_tables.borrow_mut().insert(table.to_string());
        tracing::debug!(table, rows = records.len(), "loaded sales records");
        Ok(())
    }

    /// Fail with `NotFound` unless every table in `tables` has been loaded.
    pub fn ensure_tables(&self, tables: &[&str]) -> Result<()> {
        for name in tables {
            if !self.registered_tables.borrow().contains(*name) {
                return Err(DashboardError::NotFound(format!(
                    "Table '{}' is not loaded; fetch sales data first",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows_result = stmt.query(bind(params).as_slice())?;

        // Column metadata is only available after the query has run.
        let (column_names, column_count) = {
            let stmt_ref = rows_result.as_ref().ok_or_else(|| {
                DashboardError::InvalidArgument("query produced no statement".to_string())
            })?;
            let names: Vec<String> = stmt_ref
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, stmt_ref.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind(params).as_slice())?;
        match rows.next()? {
            Some(row) => Ok(Some(convert_value_ref(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// Check whether a table has been loaded.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return the names of all loaded tables, sorted.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Drop every loaded table.
    pub fn reset_tables(&self) -> Result<()> {
        let names = self.tables();
        for name in &names {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {}", name))?;
        }
        self.registered_tables.borrow_mut().clear();
        Ok(())
    }
}

/// Positional parameters are always bound as text; DuckDB casts them where
/// the statement needs another type.
fn bind(params: &[String]) -> Vec<&dyn duckdb::ToSql> {
    params.iter().map(|p| p as &dyn duckdb::ToSql).collect()
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    use serde_json::{Number, Value};

    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Number(n.into()),
        ValueRef::SmallInt(n) => Value::Number(n.into()),
        ValueRef::Int(n) => Value::Number(n.into()),
        ValueRef::BigInt(n) => Value::Number(n.into()),
        ValueRef::UTinyInt(n) => Value::Number(n.into()),
        ValueRef::USmallInt(n) => Value::Number(n.into()),
        ValueRef::UInt(n) => Value::Number(n.into()),
        ValueRef::UBigInt(n) => Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // SUM over integers yields HUGEINT; fall back to text past i64.
            if let Ok(i) = i64::try_from(n) {
                Value::Number(i.into())
            } else {
                Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_FROM_CE)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        // Time, timestamp, interval, nested and blob values have no column
        // in the sales table.
        _ => Value::Null,
    }
}
