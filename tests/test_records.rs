//! Validation of endpoint objects into `SalesRecord`s.

mod common;

use chrono::NaiveDate;
use common::{dec, raw_record, sample_json};
use sales_dashboard::models::{parse_records, RecordPolicy, RecordRow, SalesRecord};
use sales_dashboard::config::MAX_PRICE;
use sales_dashboard::DashboardError;

// ---------------------------------------------------------------------------
// SalesRecord::from_json
// ---------------------------------------------------------------------------

#[test]
fn from_json_reads_every_field() {
    let raw = raw_record(
        "Celular",
        "eletronicos",
        1999.99,
        "20/01/2021",
        "Juliana Costa",
        "São Paulo",
        -23.55,
        -46.64,
    );
    let record = SalesRecord::from_json(0, &raw).unwrap();

    assert_eq!(record.product, "Celular");
    assert_eq!(record.category, "eletronicos");
    assert_eq!(record.price, dec("1999.99"));
    assert_eq!(record.purchase_date, NaiveDate::from_ymd_opt(2021, 1, 20).unwrap());
    assert_eq!(record.seller, "Juliana Costa");
    assert_eq!(record.state, "São Paulo");
    assert_eq!(record.latitude, -23.55);
    assert_eq!(record.longitude, -46.64);
}

#[test]
fn from_json_keeps_price_exact() {
    let raw = raw_record("Bola", "esporte e lazer", 0.1, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    let record = SalesRecord::from_json(0, &raw).unwrap();
    assert_eq!(record.price, dec("0.1"));
}

#[test]
fn from_json_accepts_integer_price() {
    let mut raw = raw_record("Bola", "esporte e lazer", 0.0, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    raw["Preço"] = serde_json::json!(150);
    let record = SalesRecord::from_json(0, &raw).unwrap();
    assert_eq!(record.price, dec("150"));
}

#[test]
fn missing_field_is_reported_by_name() {
    let mut raw = raw_record("Bola", "esporte e lazer", 10.0, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    raw.as_object_mut().unwrap().remove("Vendedor");

    let err = SalesRecord::from_json(3, &raw).unwrap_err();
    match err {
        DashboardError::MalformedRecord { index, field, .. } => {
            assert_eq!(index, 3);
            assert_eq!(field, "Vendedor");
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn null_field_counts_as_missing() {
    let mut raw = raw_record("Bola", "esporte e lazer", 10.0, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    raw["Local da compra"] = serde_json::Value::Null;

    let err = SalesRecord::from_json(0, &raw).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::MalformedRecord { field: "Local da compra", .. }
    ));
}

#[test]
fn string_price_is_rejected_not_coerced() {
    let mut raw = raw_record("Bola", "esporte e lazer", 10.0, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    raw["Preço"] = serde_json::json!("10.00");

    let err = SalesRecord::from_json(0, &raw).unwrap_err();
    assert!(matches!(err, DashboardError::MalformedRecord { field: "Preço", .. }));
}

#[test]
fn negative_price_is_kept() {
    let raw = raw_record("Bola", "esporte e lazer", -5.0, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    let record = SalesRecord::from_json(0, &raw).unwrap();
    assert_eq!(record.price, dec("-5"));
}

#[test]
fn oversized_price_is_rejected() {
    let raw = raw_record("Bola", "esporte e lazer", 5e28, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    let err = SalesRecord::from_json(3, &raw).unwrap_err();
    assert!(matches!(err, DashboardError::MalformedRecord { index: 3, field: "Preço", .. }));

    let raw = raw_record("Bola", "esporte e lazer", -5e28, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    assert!(SalesRecord::from_json(0, &raw).is_err());
}

#[test]
fn price_at_the_maximum_is_accepted() {
    let raw = raw_record("Bola", "esporte e lazer", 1e15, "01/02/2020", "A", "Bahia", 0.0, 0.0);
    let record = SalesRecord::from_json(0, &raw).unwrap();
    assert_eq!(record.price, rust_decimal::Decimal::from(MAX_PRICE));
}

#[test]
fn iso_date_is_rejected() {
    let raw = raw_record("Bola", "esporte e lazer", 10.0, "2020-02-01", "A", "Bahia", 0.0, 0.0);
    let err = SalesRecord::from_json(0, &raw).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::MalformedRecord { field: "Data da Compra", .. }
    ));
}

#[test]
fn impossible_date_is_rejected() {
    let raw = raw_record("Bola", "esporte e lazer", 10.0, "31/02/2020", "A", "Bahia", 0.0, 0.0);
    assert!(SalesRecord::from_json(0, &raw).is_err());
}

#[test]
fn out_of_range_latitude_is_rejected() {
    let raw = raw_record("Bola", "esporte e lazer", 10.0, "01/02/2020", "A", "Bahia", 123.0, 0.0);
    let err = SalesRecord::from_json(0, &raw).unwrap_err();
    assert!(matches!(err, DashboardError::MalformedRecord { field: "lat", .. }));
}

#[test]
fn non_object_record_is_rejected() {
    let err = SalesRecord::from_json(0, &serde_json::json!([1, 2])).unwrap_err();
    assert!(matches!(err, DashboardError::MalformedRecord { .. }));
}

// ---------------------------------------------------------------------------
// parse_records
// ---------------------------------------------------------------------------

#[test]
fn parse_records_validates_whole_sample() {
    let batch = parse_records(&sample_json(), RecordPolicy::Strict).unwrap();
    assert_eq!(batch.records.len(), 8);
    assert_eq!(batch.skipped, 0);
}

#[test]
fn parse_records_accepts_empty_array() {
    let batch = parse_records(&serde_json::json!([]), RecordPolicy::Strict).unwrap();
    assert!(batch.records.is_empty());
}

#[test]
fn parse_records_rejects_non_array_body() {
    let err = parse_records(&serde_json::json!({"data": []}), RecordPolicy::Strict).unwrap_err();
    assert!(err.is_data_source());
}

#[test]
fn strict_policy_fails_the_batch() {
    let mut body = sample_json();
    body[2]["Data da Compra"] = serde_json::json!("not a date");

    let err = parse_records(&body, RecordPolicy::Strict).unwrap_err();
    match err {
        DashboardError::MalformedRecord { index, field, .. } => {
            assert_eq!(index, 2);
            assert_eq!(field, "Data da Compra");
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn lenient_policy_skips_and_counts() {
    let mut body = sample_json();
    body[2]["Data da Compra"] = serde_json::json!("not a date");
    body[5].as_object_mut().unwrap().remove("lon");

    let batch = parse_records(&body, RecordPolicy::Lenient).unwrap();
    assert_eq!(batch.records.len(), 6);
    assert_eq!(batch.skipped, 2);
    assert!(batch.records.iter().all(|r| r.product != "Cama box"));
}

// ---------------------------------------------------------------------------
// RecordRow
// ---------------------------------------------------------------------------

#[test]
fn record_row_uses_iso_date() {
    let records = common::sample_records();
    let row = RecordRow::from(&records[0]);
    assert_eq!(row.purchase_date, "2020-01-05");
    assert_eq!(row.price, 1200.5);
}
