use chrono::Datelike;

use crate::models::{Filter, Region, SalesRecord};

/// Apply a [`Filter`] to already-fetched records.
///
/// The region is a pass-through: the data source scopes its response to the
/// requested region and records carry no region field to check against.
/// The year is checked locally, which is a no-op on a correctly scoped
/// response. An empty seller set keeps every seller.
pub fn filter_records(records: &[SalesRecord], filter: &Filter) -> Vec<SalesRecord> {
    if filter.region != Region::Brasil {
        tracing::trace!(region = %filter.region, "region already applied by the data source");
    }

    records
        .iter()
        .filter(|r| match filter.year {
            Some(year) => r.purchase_date.year() == year,
            None => true,
        })
        .filter(|r| filter.sellers.is_empty() || filter.sellers.contains(&r.seller))
        .cloned()
        .collect()
}
