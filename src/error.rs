#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed record #{index}: field '{field}' {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DashboardError {
    /// Whether the error came from retrieving the dataset (network, HTTP
    /// status, or an undecodable response body) rather than from the data
    /// itself or local processing.
    pub fn is_data_source(&self) -> bool {
        matches!(self, DashboardError::Http(_) | DashboardError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
