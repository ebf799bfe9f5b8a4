/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Runs the blocking fetch and DuckDB work on tokio's blocking pool and
    /// serializes concurrent requests.
    pub dashboard: sales_dashboard::AsyncSalesDashboard,
}
