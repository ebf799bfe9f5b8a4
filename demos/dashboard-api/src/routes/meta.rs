use axum::response::Json;
use sales_dashboard::config;
use sales_dashboard::SalesDashboard;
use serde_json::{json, Value};

/// GET /api/regions
///
/// Returns the selector options: regions (with their query values) and the
/// year range.
pub async fn list_regions() -> Json<Value> {
    let regions: Vec<Value> = SalesDashboard::regions()
        .iter()
        .map(|r| json!({ "name": r.name(), "value": r.query_value() }))
        .collect();

    Json(json!({
        "regions": regions,
        "years": config::YEAR_RANGE.collect::<Vec<_>>(),
    }))
}
