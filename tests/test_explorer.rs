//! Record explorer: search, count, distinct values and CSV export.

mod common;

use chrono::NaiveDate;
use common::{offline_dashboard, sample_json};
use sales_dashboard::models::{Filter, RecordPolicy};
use sales_dashboard::queries::{RecordColumn, RecordQuery, SearchRecordsParams};
use sales_dashboard::DashboardError;

fn products(rows: &[sales_dashboard::models::RecordRow]) -> Vec<&str> {
    rows.iter().map(|r| r.product.as_str()).collect()
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[test]
fn search_without_filters_returns_all_by_date() {
    let (conn, _tmp) = common::setup_sample_db();
    let rows = RecordQuery::new(&conn)
        .search(&SearchRecordsParams::default())
        .unwrap();

    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0].purchase_date, "2020-01-05");
    assert_eq!(rows[7].purchase_date, "2022-06-15");
}

#[test]
fn search_by_product_substring_ignores_case() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        product: Some("CELU".to_string()),
        ..Default::default()
    };
    let rows = RecordQuery::new(&conn).search(&params).unwrap();
    assert_eq!(products(&rows), vec!["Celular", "Celular"]);
}

#[test]
fn search_product_wildcards_match_literally() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        product: Some("%".to_string()),
        ..Default::default()
    };
    assert!(RecordQuery::new(&conn).search(&params).unwrap().is_empty());
}

#[test]
fn search_by_lists() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        categories: vec!["moveis".to_string(), "eletronicos".to_string()],
        states: vec!["Bahia".to_string()],
        ..Default::default()
    };
    let rows = RecordQuery::new(&conn).search(&params).unwrap();
    assert_eq!(products(&rows), vec!["Cama box", "Cadeira de escritório"]);

    let params = SearchRecordsParams {
        sellers: vec!["Lucas Oliveira".to_string()],
        ..Default::default()
    };
    let rows = RecordQuery::new(&conn).search(&params).unwrap();
    assert_eq!(products(&rows), vec!["Fone de ouvido"]);
}

#[test]
fn search_by_price_range() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        price_min: Some(420.0),
        price_max: Some(1000.0),
        sort_by: Some(RecordColumn::Price),
        ..Default::default()
    };
    let rows = RecordQuery::new(&conn).search(&params).unwrap();
    assert_eq!(products(&rows), vec!["Cadeira de escritório", "Cama box", "Guitarra"]);
}

#[test]
fn search_by_date_range_is_inclusive() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        date_from: NaiveDate::from_ymd_opt(2021, 1, 20),
        date_to: NaiveDate::from_ymd_opt(2021, 12, 28),
        ..Default::default()
    };
    let rows = RecordQuery::new(&conn).search(&params).unwrap();
    assert_eq!(
        products(&rows),
        vec!["Celular", "Bola de futebol", "Cadeira de escritório"]
    );
}

#[test]
fn search_sorts_descending_with_pagination() {
    let (conn, _tmp) = common::setup_sample_db();
    let page = |offset| SearchRecordsParams {
        sort_by: Some(RecordColumn::Price),
        descending: true,
        limit: Some(3),
        offset: Some(offset),
        ..Default::default()
    };

    let first = RecordQuery::new(&conn).search(&page(0)).unwrap();
    assert_eq!(products(&first), vec!["Celular", "Celular", "Guitarra"]);
    assert_eq!(first[0].price, 2100.0);

    let last = RecordQuery::new(&conn).search(&page(6)).unwrap();
    assert_eq!(products(&last), vec!["Fone de ouvido", "Bola de futebol"]);
}

#[test]
fn reversed_ranges_are_rejected() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        price_min: Some(10.0),
        price_max: Some(1.0),
        ..Default::default()
    };
    let err = RecordQuery::new(&conn).search(&params).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidArgument(_)));

    let params = SearchRecordsParams {
        date_from: NaiveDate::from_ymd_opt(2022, 1, 1),
        date_to: NaiveDate::from_ymd_opt(2021, 1, 1),
        ..Default::default()
    };
    let err = RecordQuery::new(&conn).count(&params).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// count / distinct_values
// ---------------------------------------------------------------------------

#[test]
fn count_ignores_pagination() {
    let (conn, _tmp) = common::setup_sample_db();
    let params = SearchRecordsParams {
        categories: vec!["eletronicos".to_string()],
        limit: Some(1),
        ..Default::default()
    };
    assert_eq!(RecordQuery::new(&conn).count(&params).unwrap(), 3);
}

#[test]
fn distinct_values_are_sorted() {
    let (conn, _tmp) = common::setup_sample_db();
    let states = RecordQuery::new(&conn)
        .distinct_values(RecordColumn::State)
        .unwrap();
    assert_eq!(
        states,
        vec!["Bahia", "Minas Gerais", "Rio de Janeiro", "São Paulo"]
    );
}

#[test]
fn distinct_values_of_numeric_column_is_rejected() {
    let (conn, _tmp) = common::setup_sample_db();
    let err = RecordQuery::new(&conn)
        .distinct_values(RecordColumn::Price)
        .unwrap_err();
    assert!(matches!(err, DashboardError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// export_csv
// ---------------------------------------------------------------------------

#[test]
fn export_csv_writes_header_and_rows() {
    let (conn, tmp) = common::setup_sample_db();
    let path = tmp.path().join("bahia.csv");
    let params = SearchRecordsParams {
        states: vec!["Bahia".to_string()],
        ..Default::default()
    };

    let written = RecordQuery::new(&conn).export_csv(&path, &params).unwrap();
    assert_eq!(written, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "product,category,price,purchase_date,seller,state,latitude,longitude"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Cama box,moveis,650.25,2020-03-02,Pedro Gomes,Bahia,"));
}

#[test]
fn export_csv_of_no_matches_writes_only_header() {
    let (conn, tmp) = common::setup_sample_db();
    let path = tmp.path().join("empty.csv");
    let params = SearchRecordsParams {
        sellers: vec!["Ninguém".to_string()],
        ..Default::default()
    };

    assert_eq!(RecordQuery::new(&conn).export_csv(&path, &params).unwrap(), 0);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
}

// ---------------------------------------------------------------------------
// Through the dashboard
// ---------------------------------------------------------------------------

#[test]
fn explorer_before_fetch_is_not_found() {
    let filter = Filter::new();
    let (dashboard, _tmp) =
        offline_dashboard(&filter.source_query(), &sample_json(), RecordPolicy::Strict);

    let err = dashboard
        .records()
        .search(&SearchRecordsParams::default())
        .unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));
}

#[test]
fn explorer_sees_the_last_fetch() {
    let filter = Filter::new();
    let (dashboard, _tmp) =
        offline_dashboard(&filter.source_query(), &sample_json(), RecordPolicy::Strict);

    let batch = dashboard.fetch(&filter.source_query()).unwrap();
    assert_eq!(batch.records.len(), 8);
    assert_eq!(
        dashboard.records().count(&SearchRecordsParams::default()).unwrap(),
        8
    );

    let rows = dashboard
        .sql(
            "SELECT SUM(price) AS total FROM sales WHERE seller = ?",
            &["Maria Ferreira".to_string()],
        )
        .unwrap();
    assert_eq!(rows[0]["total"], 2520.0);
}
