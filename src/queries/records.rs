//! Record explorer over the DuckDB `sales` table.

use std::path::Path;

use chrono::NaiveDate;

use crate::config;
use crate::connection::{Connection, SALES_COLUMNS};
use crate::error::{DashboardError, Result};
use crate::models::RecordRow;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// RecordColumn
// ---------------------------------------------------------------------------

/// A column of the `sales` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordColumn {
    Product,
    Category,
    Price,
    PurchaseDate,
    Seller,
    State,
    Latitude,
    Longitude,
}

impl RecordColumn {
    pub fn name(&self) -> &'static str {
        match self {
            RecordColumn::Product => "product",
            RecordColumn::Category => "category",
            RecordColumn::Price => "price",
            RecordColumn::PurchaseDate => "purchase_date",
            RecordColumn::Seller => "seller",
            RecordColumn::State => "state",
            RecordColumn::Latitude => "latitude",
            RecordColumn::Longitude => "longitude",
        }
    }

    fn is_text(&self) -> bool {
        !matches!(
            self,
            RecordColumn::Price | RecordColumn::Latitude | RecordColumn::Longitude
        )
    }
}

// ---------------------------------------------------------------------------
// SearchRecordsParams
// ---------------------------------------------------------------------------

/// Explorer filters. Empty lists and `None` bounds impose no restriction.
#[derive(Debug, Clone, Default)]
pub struct SearchRecordsParams {
    /// Case-insensitive substring of the product name.
    pub product: Option<String>,
    pub categories: Vec<String>,
    pub sellers: Vec<String>,
    pub states: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Defaults to purchase date.
    pub sort_by: Option<RecordColumn>,
    pub descending: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SearchRecordsParams {
    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                return Err(DashboardError::InvalidArgument(format!(
                    "price_min ({}) is greater than price_max ({})",
                    min, max
                )));
            }
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(DashboardError::InvalidArgument(format!(
                    "date_from ({}) is after date_to ({})",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordQuery
// ---------------------------------------------------------------------------

/// Query interface over the records of the last fetch.
pub struct RecordQuery<'a> {
    conn: &'a Connection,
}

impl<'a> RecordQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Builder with every filter of `params` applied and no ordering or
    /// pagination.
    fn filtered(&self, params: &SearchRecordsParams) -> Result<SqlBuilder> {
        params.validate()?;
        self.conn.ensure_tables(&[config::SALES_TABLE])?;

        let mut qb = SqlBuilder::new(config::SALES_TABLE);
        let columns: Vec<&str> = SALES_COLUMNS.iter().map(|(name, _)| *name).collect();
        qb.select(&columns);

        if let Some(ref product) = params.product {
            qb.where_contains("product", product);
        }
        for (column, values) in [
            ("category", &params.categories),
            ("seller", &params.sellers),
            ("state", &params.states),
        ] {
            if !values.is_empty() {
                let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
                qb.where_in(column, &refs);
            }
        }
        if let Some(min) = params.price_min {
            qb.where_number_gte("price", min);
        }
        if let Some(max) = params.price_max {
            qb.where_number_lte("price", max);
        }
        if let Some(from) = params.date_from {
            qb.where_gte("purchase_date", &from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = params.date_to {
            qb.where_lte("purchase_date", &to.format("%Y-%m-%d").to_string());
        }

        Ok(qb)
    }

    /// Records matching `params`, ordered and paginated.
    pub fn search(&self, params: &SearchRecordsParams) -> Result<Vec<RecordRow>> {
        let mut qb = self.filtered(params)?;

        let sort = params.sort_by.unwrap_or(RecordColumn::PurchaseDate).name();
        let direction = if params.descending { "DESC" } else { "ASC" };
        let primary = format!("{} {}", sort, direction);
        // Secondary keys keep pagination stable across equal sort values.
        qb.order_by(&[primary.as_str(), "purchase_date ASC", "product ASC", "seller ASC"]);

        if let Some(n) = params.limit {
            qb.limit(n);
        }
        if let Some(n) = params.offset {
            qb.offset(n);
        }

        let (sql, values) = qb.build();
        self.conn.execute_into(&sql, &values)
    }

    /// Number of records matching `params`, ignoring pagination.
    pub fn count(&self, params: &SearchRecordsParams) -> Result<u64> {
        let (inner, values) = self.filtered(params)?.build();
        let sql = format!("SELECT COUNT(*) FROM ({})", inner);
        let count = self
            .conn
            .execute_scalar(&sql, &values)?
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        Ok(count)
    }

    /// Sorted distinct values of a text column.
    pub fn distinct_values(&self, column: RecordColumn) -> Result<Vec<String>> {
        if !column.is_text() {
            return Err(DashboardError::InvalidArgument(format!(
                "distinct_values needs a text column, got '{}'",
                column.name()
            )));
        }
        self.conn.ensure_tables(&[config::SALES_TABLE])?;

        let name = column.name();
        let (sql, values) = SqlBuilder::new(config::SALES_TABLE)
            .select(&[name])
            .distinct()
            .order_by(&[name])
            .build();

        let rows = self.conn.execute(&sql, &values)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.get(name).and_then(|v| v.as_str()).map(|s| s.to_string()))
            .collect())
    }

    /// Write the records matching `params` to a CSV file with a header row.
    ///
    /// Returns the number of data rows written.
    pub fn export_csv<P: AsRef<Path>>(
        &self,
        path: P,
        params: &SearchRecordsParams,
    ) -> Result<usize> {
        let rows = self.search(params)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path.as_ref())?;
        writer.write_record(SALES_COLUMNS.iter().map(|(name, _)| *name))?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        tracing::info!(
            path = %path.as_ref().display(),
            rows = rows.len(),
            "exported sales records"
        );
        Ok(rows.len())
    }
}
