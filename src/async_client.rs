//! Async wrapper around [`SalesDashboard`] for use in async runtimes.
//!
//! Runs every dashboard operation on tokio's blocking thread pool via
//! [`tokio::task::spawn_blocking`]; the blocking HTTP fetch and the DuckDB
//! queries never run on the event loop.
//!
//! # Example
//!
//! ```no_run
//! use sales_dashboard::{AsyncSalesDashboard, Filter, ViewOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let dashboard = AsyncSalesDashboard::builder().build().await.unwrap();
//!
//!     let view = dashboard
//!         .render(Filter::new(), ViewOptions::default())
//!         .await
//!         .unwrap();
//!     println!("{}", view.metrics.revenue_label);
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::ViewOptions;
use crate::error::{DashboardError, Result};
use crate::models::{DashboardView, Filter, RecordBatch, RecordPolicy, SourceQuery};
use crate::{config, SalesDashboard};

// ---------------------------------------------------------------------------
// AsyncSalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesDashboard`].
pub struct AsyncSalesDashboardBuilder {
    endpoint: Option<String>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    cache_ttl: Duration,
    retries: u32,
    record_policy: RecordPolicy,
}

impl Default for AsyncSalesDashboardBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            cache_ttl: config::DEFAULT_CACHE_TTL,
            retries: config::DEFAULT_RETRIES,
            record_policy: RecordPolicy::default(),
        }
    }
}

impl AsyncSalesDashboardBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    /// Build the dashboard on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncSalesDashboard> {
        tokio::task::spawn_blocking(move || {
            let mut builder = SalesDashboard::builder()
                .offline(self.offline)
                .timeout(self.timeout)
                .cache_ttl(self.cache_ttl)
                .retries(self.retries)
                .record_policy(self.record_policy);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(url) = self.endpoint {
                builder = builder.endpoint(url);
            }
            let dashboard = builder.build()?;
            Ok(AsyncSalesDashboard {
                inner: Arc::new(Mutex::new(dashboard)),
            })
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesDashboard`].
///
/// The dashboard uses `RefCell` internally, so it sits behind a [`Mutex`]
/// and concurrent calls are serialized.
#[derive(Clone)]
pub struct AsyncSalesDashboard {
    inner: Arc<Mutex<SalesDashboard>>,
}

impl AsyncSalesDashboard {
    pub fn builder() -> AsyncSalesDashboardBuilder {
        AsyncSalesDashboardBuilder::default()
    }

    /// Run a sync dashboard operation on the blocking thread pool.
    ///
    /// ```no_run
    /// # use sales_dashboard::AsyncSalesDashboard;
    /// # use sales_dashboard::queries::RecordColumn;
    /// # async fn example() -> sales_dashboard::Result<()> {
    /// # let dashboard = AsyncSalesDashboard::builder().build().await?;
    /// let states = dashboard
    ///     .run(|d| d.records().distinct_values(RecordColumn::State))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesDashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = dashboard
                .lock()
                .map_err(|_| DashboardError::InvalidArgument("Dashboard lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Run one render cycle asynchronously.
    pub async fn render(&self, filter: Filter, options: ViewOptions) -> Result<DashboardView> {
        self.run(move |d| d.render(&filter, &options)).await
    }

    /// Fetch and validate the records for one region/year scope.
    pub async fn fetch(&self, query: SourceQuery) -> Result<RecordBatch> {
        self.run(move |d| d.fetch(&query)).await
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |d| d.sql(&query, &params)).await
    }

    /// Remove every cached response asynchronously.
    pub async fn clear_cache(&self) -> Result<()> {
        self.run(|d| d.clear_cache()).await
    }
}
