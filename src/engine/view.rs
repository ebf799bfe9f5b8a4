//! Assembly of the [`DashboardView`] from a fetched record set.

use std::collections::BTreeSet;

use rust_decimal::prelude::ToPrimitive;

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{
    DashboardView, Filter, Measure, Metrics, QuantitySection, RevenueSection, SalesRecord,
    SellerSection,
};

use super::aggregate::{
    dimension_rows, fill_month_gaps, month_rows, state_rows, tables, top_n, total,
};
use super::filter::filter_records;
use super::format::{format_magnitude_with, MagnitudeUnits};

/// Presentation knobs that do not affect which records are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// Rows in the top-states-by-count chart.
    pub top_states: usize,
    /// Rows in both top-sellers charts.
    pub top_sellers: usize,
    /// Insert zero months between the first and last month of the series.
    pub fill_month_gaps: bool,
    pub units: MagnitudeUnits,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            top_states: config::DEFAULT_TOP_STATES,
            top_sellers: config::DEFAULT_TOP_SELLERS,
            fill_month_gaps: true,
            units: MagnitudeUnits::ENGLISH,
        }
    }
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_states(mut self, n: usize) -> Self {
        self.top_states = n;
        self
    }

    pub fn top_sellers(mut self, n: usize) -> Self {
        self.top_sellers = n;
        self
    }

    pub fn fill_month_gaps(mut self, fill: bool) -> Self {
        self.fill_month_gaps = fill;
        self
    }

    pub fn units(mut self, units: MagnitudeUnits) -> Self {
        self.units = units;
        self
    }

    /// Check the top-N values against the ranges the selectors allow.
    pub fn validate(&self) -> Result<()> {
        if !config::TOP_STATES_RANGE.contains(&self.top_states) {
            return Err(DashboardError::InvalidArgument(format!(
                "top_states must be within {}..={}, got {}",
                config::TOP_STATES_RANGE.start(),
                config::TOP_STATES_RANGE.end(),
                self.top_states
            )));
        }
        if !config::TOP_SELLERS_RANGE.contains(&self.top_sellers) {
            return Err(DashboardError::InvalidArgument(format!(
                "top_sellers must be within {}..={}, got {}",
                config::TOP_SELLERS_RANGE.start(),
                config::TOP_SELLERS_RANGE.end(),
                self.top_sellers
            )));
        }
        Ok(())
    }
}

/// Filter `fetched` and build every table and metric of the dashboard.
///
/// `fetched` is the data-source response for `filter`'s region and year;
/// the seller options are taken from it before the seller filter applies.
pub fn build_view(
    fetched: &[SalesRecord],
    skipped_records: usize,
    filter: &Filter,
    options: &ViewOptions,
) -> Result<DashboardView> {
    options.validate()?;

    let available_sellers: Vec<String> = fetched
        .iter()
        .map(|r| r.seller.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let records = filter_records(fetched, filter);
    let tables = tables(&records);
    let grand = total(&records);

    let months = if options.fill_month_gaps {
        month_rows(&fill_month_gaps(&tables.by_month))
    } else {
        month_rows(&tables.by_month)
    };

    let states_by_revenue = state_rows(&tables.by_state, Measure::Revenue);
    let states_by_count = state_rows(&tables.by_state, Measure::Count);
    let categories_by_count = dimension_rows(&tables.by_category, Measure::Count);

    let metrics = Metrics {
        revenue: grand.revenue,
        sales_count: grand.count,
        revenue_label: format_magnitude_with(
            grand.revenue.to_f64().unwrap_or(0.0),
            config::REVENUE_PREFIX,
            &options.units,
        ),
        sales_count_label: format_magnitude_with(grand.count as f64, "", &options.units),
    };

    tracing::debug!(
        records = records.len(),
        states = tables.by_state.len(),
        months = tables.by_month.len(),
        categories = tables.by_category.len(),
        sellers = tables.by_seller.len(),
        "built dashboard view"
    );

    Ok(DashboardView {
        filter: filter.clone(),
        metrics,
        available_sellers,
        revenue: RevenueSection {
            top_states: top_n(states_by_revenue.clone(), config::TOP_STATES_BY_REVENUE),
            state_map: states_by_revenue,
            monthly: months.clone(),
            categories: dimension_rows(&tables.by_category, Measure::Revenue),
        },
        quantity: QuantitySection {
            top_states: top_n(states_by_count.clone(), options.top_states),
            state_map: states_by_count,
            monthly: months,
            top_categories: top_n(categories_by_count, config::TOP_CATEGORIES),
        },
        sellers: SellerSection {
            top_by_revenue: top_n(
                dimension_rows(&tables.by_seller, Measure::Revenue),
                options.top_sellers,
            ),
            top_by_count: top_n(
                dimension_rows(&tables.by_seller, Measure::Count),
                options.top_sellers,
            ),
        },
        skipped_records,
    })
}
