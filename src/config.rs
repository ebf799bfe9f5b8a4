use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub const SALES_URL: &str = "https://labdados.com/produtos";

/// Query parameter carrying the lowercased region name.
pub const REGION_PARAM: &str = "regiao";
/// Query parameter carrying the four-digit year.
pub const YEAR_PARAM: &str = "ano";

/// Years offered by the year selector.
pub const YEAR_RANGE: RangeInclusive<i32> = 2020..=2023;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_RETRIES: u32 = 2;
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(4);

// Top-N controls
pub const TOP_STATES_RANGE: RangeInclusive<usize> = 2..=10;
pub const DEFAULT_TOP_STATES: usize = 5;
pub const TOP_SELLERS_RANGE: RangeInclusive<usize> = 2..=10;
pub const DEFAULT_TOP_SELLERS: usize = 5;
/// Rows shown in the top-states-by-revenue bar chart.
pub const TOP_STATES_BY_REVENUE: usize = 5;
pub const TOP_CATEGORIES: usize = 8;

pub const REVENUE_PREFIX: &str = "R$";

/// Largest accepted price magnitude. Keeps every revenue sum far inside
/// `Decimal`'s range, so aggregation never overflows.
pub const MAX_PRICE: i64 = 1_000_000_000_000_000;

/// Name of the DuckDB table holding the records of the last fetch.
pub const SALES_TABLE: &str = "sales";

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("sales-dashboard")
    } else {
        PathBuf::from(".sales-dashboard-cache")
    }
}
