use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config;
use crate::error::{DashboardError, Result};

/// Field names used by the sales endpoint.
pub mod fields {
    pub const PRODUCT: &str = "Produto";
    pub const CATEGORY: &str = "Categoria do Produto";
    pub const PRICE: &str = "Preço";
    pub const PURCHASE_DATE: &str = "Data da Compra";
    pub const SELLER: &str = "Vendedor";
    pub const STATE: &str = "Local da compra";
    pub const LATITUDE: &str = "lat";
    pub const LONGITUDE: &str = "lon";
}

/// Date format of the `Data da Compra` field.
pub const PURCHASE_DATE_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// SalesRecord — One validated sale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product: String,
    pub category: String,
    pub price: Decimal,
    pub purchase_date: NaiveDate,
    pub seller: String,
    /// Purchase location (Brazilian state name).
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SalesRecord {
    /// Validate one raw endpoint object.
    ///
    /// `index` is the position of the object in the response array and is
    /// only used to build the [`DashboardError::MalformedRecord`] error.
    pub fn from_json(index: usize, value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| DashboardError::MalformedRecord {
            index,
            field: "<record>",
            reason: "is not a JSON object".to_string(),
        })?;

        let raw_date = string_field(obj, index, fields::PURCHASE_DATE)?;
        let purchase_date = NaiveDate::parse_from_str(&raw_date, PURCHASE_DATE_FORMAT)
            .map_err(|e| DashboardError::MalformedRecord {
                index,
                field: fields::PURCHASE_DATE,
                reason: format!("'{}' is not a DD/MM/YYYY date ({})", raw_date, e),
            })?;

        let latitude = coordinate_field(obj, index, fields::LATITUDE, 90.0)?;
        let longitude = coordinate_field(obj, index, fields::LONGITUDE, 180.0)?;

        Ok(Self {
            product: string_field(obj, index, fields::PRODUCT)?,
            category: string_field(obj, index, fields::CATEGORY)?,
            price: price_field(obj, index)?,
            purchase_date,
            seller: string_field(obj, index, fields::SELLER)?,
            state: string_field(obj, index, fields::STATE)?,
            latitude,
            longitude,
        })
    }
}

fn required<'v>(
    obj: &'v Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'v Value> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(DashboardError::MalformedRecord {
            index,
            field,
            reason: "is missing".to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn string_field(obj: &Map<String, Value>, index: usize, field: &'static str) -> Result<String> {
    match required(obj, index, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(DashboardError::MalformedRecord {
            index,
            field,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

/// Prices go through the number's decimal text so that `12.3` stays exactly
/// `12.3` instead of the nearest binary float.
fn price_field(obj: &Map<String, Value>, index: usize) -> Result<Decimal> {
    let field = fields::PRICE;
    let number = match required(obj, index, field)? {
        Value::Number(n) => n,
        other => {
            return Err(DashboardError::MalformedRecord {
                index,
                field,
                reason: format!("expected a number, got {}", other),
            })
        }
    };

    let text = number.to_string();
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| DashboardError::MalformedRecord {
            index,
            field,
            reason: format!("{} is not a representable amount ({})", text, e),
        })?;

    // Negative prices (refunds, corrections) are kept and reduce the sums.
    if price.abs() > Decimal::from(config::MAX_PRICE) {
        return Err(DashboardError::MalformedRecord {
            index,
            field,
            reason: format!("{} exceeds the maximum amount {}", price, config::MAX_PRICE),
        });
    }
    Ok(price)
}

fn coordinate_field(
    obj: &Map<String, Value>,
    index: usize,
    field: &'static str,
    bound: f64,
) -> Result<f64> {
    let value = required(obj, index, field)?;
    let coord = value.as_f64().ok_or_else(|| DashboardError::MalformedRecord {
        index,
        field,
        reason: format!("expected a number, got {}", value),
    })?;
    if !(-bound..=bound).contains(&coord) {
        return Err(DashboardError::MalformedRecord {
            index,
            field,
            reason: format!("{} is outside [-{}, {}]", coord, bound, bound),
        });
    }
    Ok(coord)
}

// ---------------------------------------------------------------------------
// RecordPolicy — What to do with a malformed record
// ---------------------------------------------------------------------------

/// How a batch reacts to a record that fails validation.
///
/// The policy applies to a whole response; there is no per-row mixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Fail the whole batch with the first [`DashboardError::MalformedRecord`].
    #[default]
    Strict,
    /// Drop malformed records, log them, and report how many were dropped.
    Lenient,
}

/// Validated records of one response plus the number of records dropped
/// under [`RecordPolicy::Lenient`].
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<SalesRecord>,
    pub skipped: usize,
}

/// Validate a decoded response body.
///
/// The body must be a JSON array; anything else is treated as a malformed
/// response, not as an empty dataset.
pub fn parse_records(body: &Value, policy: RecordPolicy) -> Result<RecordBatch> {
    let items = body.as_array().ok_or_else(|| {
        DashboardError::Json(serde::de::Error::custom(format!(
            "expected a JSON array of sales records, got {}",
            json_kind(body)
        )))
    })?;

    let mut batch = RecordBatch {
        records: Vec::with_capacity(items.len()),
        skipped: 0,
    };

    for (index, item) in items.iter().enumerate() {
        match SalesRecord::from_json(index, item) {
            Ok(record) => batch.records.push(record),
            Err(e) if policy == RecordPolicy::Lenient => {
                tracing::warn!(error = %e, "skipping malformed sales record");
                batch.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(batch)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// RecordRow — Flat row stored in and read back from DuckDB
// ---------------------------------------------------------------------------

/// Flat representation of a [`SalesRecord`] used by the record explorer.
///
/// `purchase_date` is an ISO `YYYY-MM-DD` string so that lexicographic
/// comparison matches chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub product: String,
    pub category: String,
    pub price: f64,
    pub purchase_date: String,
    pub seller: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&SalesRecord> for RecordRow {
    fn from(r: &SalesRecord) -> Self {
        use rust_decimal::prelude::ToPrimitive;

        Self {
            product: r.product.clone(),
            category: r.category.clone(),
            price: r.price.to_f64().unwrap_or(0.0),
            purchase_date: r.purchase_date.format("%Y-%m-%d").to_string(),
            seller: r.seller.clone(),
            state: r.state.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}
