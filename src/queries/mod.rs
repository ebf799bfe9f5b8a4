//! Query modules over the DuckDB tables loaded by the dashboard.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection).

pub mod records;

pub use records::{RecordColumn, RecordQuery, SearchRecordsParams};
