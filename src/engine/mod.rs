//! Filtering and aggregation pipeline.
//!
//! Everything in this module is a pure function of its inputs: records in,
//! tables and formatted labels out.

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod view;

pub use aggregate::{
    aggregate, by_category, by_month, by_seller, by_state, dimension_rows, fill_month_gaps,
    month_rows, state_rows, tables, top_n, total,
};
pub use filter::filter_records;
pub use format::{format_magnitude, format_magnitude_with, MagnitudeUnits};
pub use view::{build_view, ViewOptions};
