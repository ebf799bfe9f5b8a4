use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use sales_dashboard::queries::{RecordColumn, SearchRecordsParams};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::dashboard::parse_filter;
use crate::state::AppState;

const COLUMNS: [RecordColumn; 8] = [
    RecordColumn::Product,
    RecordColumn::Category,
    RecordColumn::Price,
    RecordColumn::PurchaseDate,
    RecordColumn::Seller,
    RecordColumn::State,
    RecordColumn::Latitude,
    RecordColumn::Longitude,
];

fn parse_column(name: &str) -> Result<RecordColumn, AppError> {
    COLUMNS
        .into_iter()
        .find(|c| c.name() == name)
        .ok_or_else(|| AppError::bad_request(format!("Unknown column '{}'", name)))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::bad_request(format!("{} must be YYYY-MM-DD: {}", field, e)))
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Deserialize)]
pub struct RecordsParams {
    pub regiao: Option<String>,
    pub ano: Option<i32>,
    pub product: Option<String>,
    /// Comma-separated lists.
    pub categories: Option<String>,
    pub sellers: Option<String>,
    pub states: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub desc: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// GET /api/records?regiao=sul&ano=2021&product=cel&sort_by=price&desc=true&limit=50
///
/// Fetch the region/year scope and page through its raw records.
pub async fn search_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsParams>,
) -> Result<Json<Value>, AppError> {
    let query = parse_filter(params.regiao.as_deref(), params.ano)?.source_query();
    let search = SearchRecordsParams {
        product: params.product,
        categories: split_list(params.categories.as_deref()),
        sellers: split_list(params.sellers.as_deref()),
        states: split_list(params.states.as_deref()),
        price_min: params.price_min,
        price_max: params.price_max,
        date_from: params
            .date_from
            .as_deref()
            .map(|d| parse_date("date_from", d))
            .transpose()?,
        date_to: params
            .date_to
            .as_deref()
            .map(|d| parse_date("date_to", d))
            .transpose()?,
        sort_by: params.sort_by.as_deref().map(parse_column).transpose()?,
        descending: params.desc,
        limit: Some(params.limit.unwrap_or(100).min(1000)),
        offset: params.offset,
    };

    let (rows, total) = state
        .dashboard
        .run(move |d| {
            d.fetch(&query)?;
            let records = d.records();
            Ok((records.search(&search)?, records.count(&search)?))
        })
        .await?;

    Ok(Json(json!({ "data": rows, "count": rows.len(), "total": total })))
}

#[derive(Deserialize)]
pub struct ValuesParams {
    pub regiao: Option<String>,
    pub ano: Option<i32>,
}

/// GET /api/records/values/{column}?regiao=nordeste
///
/// Distinct values of a text column for the region/year scope.
pub async fn distinct_values(
    State(state): State<Arc<AppState>>,
    Path(column): Path<String>,
    Query(params): Query<ValuesParams>,
) -> Result<Json<Value>, AppError> {
    let column = parse_column(&column)?;
    let query = parse_filter(params.regiao.as_deref(), params.ano)?.source_query();

    let values = state
        .dashboard
        .run(move |d| {
            d.fetch(&query)?;
            d.records().distinct_values(column)
        })
        .await?;

    Ok(Json(json!({ "data": values })))
}
