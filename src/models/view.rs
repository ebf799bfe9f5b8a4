use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filter::Filter;
use super::table::{DimensionRow, MonthRow, StateRow};

// ---------------------------------------------------------------------------
// DashboardView — Everything a presentation layer needs for one render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub filter: Filter,
    pub metrics: Metrics,
    /// Sellers present in the fetched data before the seller filter, sorted.
    /// These are the options of the seller multiselect.
    pub available_sellers: Vec<String>,
    pub revenue: RevenueSection,
    pub quantity: QuantitySection,
    pub sellers: SellerSection,
    /// Records dropped by a lenient record policy.
    pub skipped_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub revenue: Decimal,
    pub sales_count: u64,
    /// e.g. `"R$ 1.23 million"`.
    pub revenue_label: String,
    /// e.g. `" 4.50 thousand"`.
    pub sales_count_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSection {
    /// All states, descending by revenue.
    pub state_map: Vec<StateRow>,
    /// Chronological.
    pub monthly: Vec<MonthRow>,
    pub top_states: Vec<StateRow>,
    /// All categories, descending by revenue.
    pub categories: Vec<DimensionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySection {
    /// All states, descending by sale count.
    pub state_map: Vec<StateRow>,
    /// Chronological.
    pub monthly: Vec<MonthRow>,
    pub top_states: Vec<StateRow>,
    pub top_categories: Vec<DimensionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSection {
    pub top_by_revenue: Vec<DimensionRow>,
    pub top_by_count: Vec<DimensionRow>,
}
