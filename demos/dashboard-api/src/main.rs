mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

#[tokio::main]
async fn main() {
    let _ = sales_dashboard::telemetry::init_default_tracing();

    tracing::info!("initializing sales dashboard");
    let offline = std::env::var("SALES_OFFLINE").is_ok_and(|v| v == "1");
    let dashboard = sales_dashboard::AsyncSalesDashboard::builder()
        .offline(offline)
        .build()
        .await
        .expect("Failed to initialize sales dashboard");
    tracing::info!(offline, "dashboard ready");

    let state = Arc::new(AppState { dashboard });

    let app = Router::new()
        .route("/api/regions", get(routes::meta::list_regions))
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/records", get(routes::records::search_records))
        .route("/api/records/values/{column}", get(routes::records::distinct_values))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = "0.0.0.0:3000";
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
