use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use sales_dashboard::DashboardError;
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        let status = match &e {
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            // The upstream endpoint failed or sent data we cannot use.
            DashboardError::MalformedRecord { .. } => StatusCode::BAD_GATEWAY,
            e if e.is_data_source() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        }
        AppError::new(status, e.to_string())
    }
}
