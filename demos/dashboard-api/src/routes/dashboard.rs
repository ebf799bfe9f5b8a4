use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use sales_dashboard::config;
use sales_dashboard::{DashboardView, Filter, Region, ViewOptions};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DashboardParams {
    /// Region name or query value; empty or absent means the whole country.
    pub regiao: Option<String>,
    pub ano: Option<i32>,
    /// Comma-separated seller names.
    pub vendedores: Option<String>,
    pub top_states: Option<usize>,
    pub top_sellers: Option<usize>,
}

/// Turn query parameters into a filter, rejecting unknown regions and years
/// outside the selector range.
pub fn parse_filter(regiao: Option<&str>, ano: Option<i32>) -> Result<Filter, AppError> {
    let region: Region = regiao.unwrap_or("").parse()?;
    if let Some(year) = ano {
        if !config::YEAR_RANGE.contains(&year) {
            return Err(AppError::bad_request(format!(
                "ano must be within {}..={}",
                config::YEAR_RANGE.start(),
                config::YEAR_RANGE.end()
            )));
        }
    }
    Ok(Filter::new().region(region).year(ano))
}

/// GET /api/dashboard?regiao=sudeste&ano=2022&vendedores=Ana,Bruno&top_states=5
///
/// Run one render cycle and return the full dashboard view.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardView>, AppError> {
    let mut filter = parse_filter(params.regiao.as_deref(), params.ano)?;
    if let Some(ref sellers) = params.vendedores {
        filter = filter.sellers(
            sellers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        );
    }

    let mut options = ViewOptions::default();
    if let Some(n) = params.top_states {
        options = options.top_states(n);
    }
    if let Some(n) = params.top_sellers {
        options = options.top_sellers(n);
    }

    let view = state.dashboard.render(filter, options).await?;
    Ok(Json(view))
}
