//! Group-by aggregation over sales records.
//!
//! Tables are `BTreeMap`s, so a table built from any permutation of the same
//! records is identical, and revenue is summed as `Decimal` so the totals do
//! not depend on summation order either. Ordering rows for display is a
//! separate step (`state_rows`, `dimension_rows`, `month_rows`).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{
    DimensionRow, DimensionTable, Measure, Measures, MonthRow, MonthTable, SalesRecord,
    SalesTables, StateEntry, StateRow, StateTable, YearMonth,
};

/// Group `records` by `key_fn` and compute revenue and count per group.
pub fn aggregate<'a, I, K, F>(records: I, key_fn: F) -> BTreeMap<K, Measures>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Ord,
    F: Fn(&SalesRecord) -> K,
{
    let mut table: BTreeMap<K, Measures> = BTreeMap::new();
    for record in records {
        table.entry(key_fn(record)).or_default().add(record.price);
    }
    table
}

/// Revenue and count per state.
///
/// Coordinates are taken from the first record seen for each state; later
/// records of the same state never overwrite them.
pub fn by_state(records: &[SalesRecord]) -> StateTable {
    let mut table = StateTable::new();
    for record in records {
        table
            .entry(record.state.clone())
            .or_insert_with(|| StateEntry {
                latitude: record.latitude,
                longitude: record.longitude,
                measures: Measures::default(),
            })
            .measures
            .add(record.price);
    }
    table
}

/// Revenue and count per calendar month, keyed by year and month so that the
/// same month of different years stays separate.
pub fn by_month(records: &[SalesRecord]) -> MonthTable {
    aggregate(records, |r| YearMonth::from_date(r.purchase_date))
}

pub fn by_category(records: &[SalesRecord]) -> DimensionTable {
    aggregate(records, |r| r.category.clone())
}

pub fn by_seller(records: &[SalesRecord]) -> DimensionTable {
    aggregate(records, |r| r.seller.clone())
}

/// All four dimension tables.
pub fn tables(records: &[SalesRecord]) -> SalesTables {
    SalesTables {
        by_state: by_state(records),
        by_month: by_month(records),
        by_category: by_category(records),
        by_seller: by_seller(records),
    }
}

/// Grand total over all records.
pub fn total(records: &[SalesRecord]) -> Measures {
    let mut measures = Measures::default();
    for record in records {
        measures.add(record.price);
    }
    measures
}

// ---------------------------------------------------------------------------
// Presentation ordering
// ---------------------------------------------------------------------------

/// Descending by the chosen measure; ties go to the smaller key.
fn by_measure_desc(a: &Measures, b: &Measures, measure: Measure) -> Ordering {
    match measure {
        Measure::Revenue => b.revenue.cmp(&a.revenue),
        Measure::Count => b.count.cmp(&a.count),
    }
}

/// State rows sorted descending by `measure`.
pub fn state_rows(table: &StateTable, measure: Measure) -> Vec<StateRow> {
    let mut entries: Vec<(&String, &StateEntry)> = table.iter().collect();
    // BTreeMap iteration is key-ascending and the sort is stable.
    entries.sort_by(|(_, a), (_, b)| by_measure_desc(&a.measures, &b.measures, measure));
    entries
        .into_iter()
        .map(|(state, entry)| StateRow {
            state: state.clone(),
            latitude: entry.latitude,
            longitude: entry.longitude,
            revenue: entry.measures.revenue,
            count: entry.measures.count,
        })
        .collect()
}

/// Category or seller rows sorted descending by `measure`.
pub fn dimension_rows(table: &DimensionTable, measure: Measure) -> Vec<DimensionRow> {
    let mut entries: Vec<(&String, &Measures)> = table.iter().collect();
    entries.sort_by(|(_, a), (_, b)| by_measure_desc(a, b, measure));
    entries
        .into_iter()
        .map(|(key, m)| DimensionRow {
            key: key.clone(),
            revenue: m.revenue,
            count: m.count,
        })
        .collect()
}

/// Month rows in chronological order.
pub fn month_rows(table: &MonthTable) -> Vec<MonthRow> {
    table
        .iter()
        .map(|(ym, m)| MonthRow {
            year: ym.year,
            month: ym.month,
            month_name: ym.month_name().to_string(),
            revenue: m.revenue,
            count: m.count,
        })
        .collect()
}

/// Insert zero-valued months between the first and last month of `table`,
/// giving a continuous monthly series for line charts.
pub fn fill_month_gaps(table: &MonthTable) -> MonthTable {
    let (Some(first), Some(last)) = (table.keys().next(), table.keys().next_back()) else {
        return MonthTable::new();
    };

    let mut filled = MonthTable::new();
    let mut current = *first;
    while current <= *last {
        let measures = table.get(&current).copied().unwrap_or(Measures {
            revenue: Decimal::ZERO,
            count: 0,
        });
        filled.insert(current, measures);
        current = current.succ();
    }
    filled
}

/// The first `n` rows of an already sorted table.
pub fn top_n<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}
