use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Measures — Per-group aggregates
// ---------------------------------------------------------------------------

/// Sum of price and number of records of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measures {
    pub revenue: Decimal,
    pub count: u64,
}

impl Measures {
    /// Prices of validated records are bounded by [`crate::config::MAX_PRICE`],
    /// so the sum stays within `Decimal`'s range.
    pub fn add(&mut self, price: Decimal) {
        self.revenue += price;
        self.count += 1;
    }
}

// ---------------------------------------------------------------------------
// YearMonth — Calendar month bucket
// ---------------------------------------------------------------------------

/// A calendar month of a specific year. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// English month name, e.g. `"January"`.
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregated tables
// ---------------------------------------------------------------------------

/// Measures of a state plus the coordinates used to place it on a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub latitude: f64,
    pub longitude: f64,
    pub measures: Measures,
}

pub type StateTable = BTreeMap<String, StateEntry>;
pub type MonthTable = BTreeMap<YearMonth, Measures>;
/// Table keyed by a plain string dimension (category or seller).
pub type DimensionTable = BTreeMap<String, Measures>;

/// All four dimension tables of one record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTables {
    pub by_state: StateTable,
    pub by_month: MonthTable,
    pub by_category: DimensionTable,
    pub by_seller: DimensionTable,
}

// ---------------------------------------------------------------------------
// Presentation rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRow {
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub revenue: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub revenue: Decimal,
    pub count: u64,
}

/// Row of a category or seller table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRow {
    pub key: String,
    pub revenue: Decimal,
    pub count: u64,
}

/// Sort key selector for presentation helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Revenue,
    Count,
}
