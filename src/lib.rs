//! Sales dashboard core for Rust.
//!
//! Fetches the regional sales dataset from the sales endpoint, validates it
//! into typed records, and turns it into the tables and metrics of a sales
//! dashboard: revenue and sale counts by state, month, category and seller.
//! Responses are cached locally and the records of the last fetch can be
//! explored with SQL via an in-memory DuckDB table.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_dashboard::{Filter, Region, SalesDashboard, ViewOptions};
//!
//! let dashboard = SalesDashboard::builder().build().unwrap();
//!
//! let filter = Filter::new().region(Region::Sudeste).year(Some(2022));
//! let view = dashboard.render(&filter, &ViewOptions::default()).unwrap();
//! println!("{}", view.metrics.revenue_label);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod models;
pub mod queries;
pub mod sql_builder;
pub mod telemetry;

#[cfg(feature = "async")]
pub use async_client::AsyncSalesDashboard;
pub use cache::CacheManager;
pub use connection::Connection;
pub use engine::{format_magnitude, format_magnitude_with, MagnitudeUnits, ViewOptions};
pub use error::{DashboardError, Result};
pub use models::{
    DashboardView, Filter, RecordBatch, RecordPolicy, Region, SalesRecord, SourceQuery,
};
pub use sql_builder::SqlBuilder;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// SalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesDashboard`].
///
/// Use [`SalesDashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SalesDashboardBuilder::build).
pub struct SalesDashboardBuilder {
    endpoint: String,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    cache_ttl: Duration,
    retries: u32,
    record_policy: RecordPolicy,
}

impl Default for SalesDashboardBuilder {
    fn default() -> Self {
        Self {
            endpoint: config::SALES_URL.to_string(),
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            cache_ttl: config::DEFAULT_CACHE_TTL,
            retries: config::DEFAULT_RETRIES,
            record_policy: RecordPolicy::default(),
        }
    }
}

impl SalesDashboardBuilder {
    /// Override the sales endpoint URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set a custom cache directory.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/sales-dashboard` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the endpoint is never contacted and only previously
    /// cached responses are used, however old. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Maximum age of a cached response before it is refetched.
    /// Defaults to one hour.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Extra attempts after a transient request failure. Defaults to 2.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// How malformed records in a response are handled.
    pub fn record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    /// Build the dashboard, creating the cache directory and the in-memory
    /// DuckDB database. Nothing is fetched until the first render.
    pub fn build(self) -> Result<SalesDashboard> {
        let mut cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        cache.endpoint = self.endpoint;
        cache.ttl = self.cache_ttl;
        cache.retries = self.retries;
        let conn = Connection::new(cache)?;
        Ok(SalesDashboard {
            conn,
            record_policy: self.record_policy,
        })
    }
}

// ---------------------------------------------------------------------------
// SalesDashboard
// ---------------------------------------------------------------------------

/// The main entry point: one render cycle is one [`render`](Self::render)
/// call with the current filter selections.
///
/// Created via [`SalesDashboard::builder()`].
pub struct SalesDashboard {
    conn: Connection,
    record_policy: RecordPolicy,
}

impl SalesDashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> SalesDashboardBuilder {
        SalesDashboardBuilder::default()
    }

    /// Regions offered by the region selector.
    pub fn regions() -> &'static [Region] {
        &Region::ALL
    }

    /// Fetch and validate the records for one region/year scope.
    ///
    /// The validated records also replace the contents of the DuckDB `sales`
    /// table used by [`records()`](Self::records).
    pub fn fetch(&self, query: &SourceQuery) -> Result<RecordBatch> {
        let body = self.conn.cache.borrow_mut().load_sales(query)?;
        let batch = models::parse_records(&body, self.record_policy)?;
        if batch.skipped > 0 {
            tracing::warn!(
                skipped = batch.skipped,
                kept = batch.records.len(),
                "dropped malformed sales records"
            );
        }
        self.conn.load_records(&batch.records)?;
        Ok(batch)
    }

    /// Run one render cycle: fetch the data for `filter`'s region and year,
    /// apply the seller filter, and build every dashboard table and metric.
    ///
    /// Any fetch or validation error aborts the cycle; no view is built from
    /// partial data.
    pub fn render(&self, filter: &Filter, options: &ViewOptions) -> Result<DashboardView> {
        options.validate()?;
        let batch = self.fetch(&filter.source_query())?;
        engine::build_view(&batch.records, batch.skipped, filter, options)
    }

    /// Access the record explorer over the records of the last fetch.
    pub fn records(&self) -> queries::RecordQuery<'_> {
        queries::RecordQuery::new(&self.conn)
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Remove every cached response and drop the loaded tables.
    pub fn clear_cache(&self) -> Result<()> {
        self.conn.cache.borrow().clear()?;
        self.conn.reset_tables()?;
        tracing::info!("sales cache cleared");
        Ok(())
    }

    /// Consume the dashboard and release the DuckDB connection and HTTP
    /// client. Dropping has the same effect.
    pub fn close(self) {
        self.conn.cache.borrow_mut().close();
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.conn.tables();
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "SalesDashboard(endpoint={}, cache_dir={}, tables=[{}], offline={})",
            cache.endpoint,
            cache.cache_dir.display(),
            tables.join(", "),
            cache.offline
        )
    }
}
