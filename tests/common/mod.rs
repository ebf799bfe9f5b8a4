//! Shared test fixtures for the sales dashboard integration tests.
//!
//! Provides a small sample response in the endpoint's wire format, helpers
//! that build records directly, and dashboards that run offline against a
//! pre-seeded temporary cache.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sales_dashboard::models::{parse_records, RecordPolicy, SalesRecord, SourceQuery};
use sales_dashboard::{CacheManager, Connection, SalesDashboard};
use std::str::FromStr;
use std::time::Duration;

/// Parse a decimal literal.
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// One endpoint object with the given values.
#[allow(clippy::too_many_arguments)]
pub fn raw_record(
    product: &str,
    category: &str,
    price: f64,
    date: &str,
    seller: &str,
    state: &str,
    lat: f64,
    lon: f64,
) -> serde_json::Value {
    serde_json::json!({
        "Produto": product,
        "Categoria do Produto": category,
        "Preço": price,
        "Frete": 25.5,
        "Data da Compra": date,
        "Vendedor": seller,
        "Local da compra": state,
        "Avaliação da compra": 4,
        "Tipo de pagamento": "cartao_credito",
        "Quantidade de parcelas": 3,
        "lat": lat,
        "lon": lon
    })
}

/// One endpoint object located at the state's capital.
fn sale(
    product: &str,
    category: &str,
    price: f64,
    date: &str,
    seller: &str,
    state: &str,
) -> serde_json::Value {
    let (lat, lon) = match state {
        "São Paulo" => (-23.55, -46.64),
        "Bahia" => (-12.97, -38.50),
        "Rio de Janeiro" => (-22.91, -43.17),
        "Minas Gerais" => (-18.10, -44.38),
        _ => (0.0, 0.0),
    };
    raw_record(product, category, price, date, seller, state, lat, lon)
}

/// Eight sales across four states, four categories, four sellers and three
/// years. Totals: revenue 7590.64, count 8.
///
/// | state          | revenue | count |
/// |----------------|---------|-------|
/// | São Paulo      | 5300.49 | 3     |
/// | Bahia          | 1070.25 | 2     |
/// | Rio de Janeiro | 1069.90 | 2     |
/// | Minas Gerais   |  150.00 | 1     |
#[rustfmt::skip]
pub fn sample_json() -> serde_json::Value {
    serde_json::Value::Array(vec![
        sale("Guitarra", "instrumentos musicais", 1200.50,
             "05/01/2020", "Pedro Gomes", "São Paulo"),
        sale("Celular", "eletronicos", 2100.00,
             "17/01/2020", "Maria Ferreira", "São Paulo"),
        sale("Cama box", "moveis", 650.25,
             "02/03/2020", "Pedro Gomes", "Bahia"),
        sale("Bola de futebol", "esporte e lazer", 89.90,
             "11/03/2021", "Juliana Costa", "Rio de Janeiro"),
        sale("Celular", "eletronicos", 1999.99,
             "20/01/2021", "Juliana Costa", "São Paulo"),
        sale("Cadeira de escritório", "moveis", 420.00,
             "28/12/2021", "Maria Ferreira", "Bahia"),
        sale("Fone de ouvido", "eletronicos", 150.00,
             "03/06/2022", "Lucas Oliveira", "Minas Gerais"),
        sale("Guitarra", "instrumentos musicais", 980.00,
             "15/06/2022", "Pedro Gomes", "Rio de Janeiro"),
    ])
}

/// The sample response, validated.
pub fn sample_records() -> Vec<SalesRecord> {
    parse_records(&sample_json(), RecordPolicy::Strict)
        .unwrap()
        .records
}

/// A record with only the fields that matter for aggregation tests set.
pub fn record(state: &str, price: &str) -> SalesRecord {
    SalesRecord {
        product: "Produto".to_string(),
        category: "categoria".to_string(),
        price: dec(price),
        purchase_date: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
        seller: "Vendedor".to_string(),
        state: state.to_string(),
        latitude: 0.0,
        longitude: 0.0,
    }
}

/// Build an offline dashboard over a temp cache seeded with `body` as the
/// response for `query`.
///
/// The caller must keep the returned `TempDir` alive for the duration of the
/// test.
pub fn offline_dashboard(
    query: &SourceQuery,
    body: &serde_json::Value,
    policy: RecordPolicy,
) -> (SalesDashboard, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dashboard = SalesDashboard::builder()
        .cache_dir(tmp_dir.path())
        .offline(true)
        .record_policy(policy)
        .build()
        .unwrap();
    dashboard
        .connection()
        .cache
        .borrow()
        .store(query, body)
        .unwrap();
    (dashboard, tmp_dir)
}

/// A `Connection` with the sample records loaded into the `sales` table.
pub fn setup_sample_db() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(
        Some(tmp_dir.path().to_path_buf()),
        true,
        Duration::from_secs(30),
    )
    .unwrap();
    let conn = Connection::new(cache).unwrap();
    conn.load_records(&sample_records()).unwrap();
    (conn, tmp_dir)
}

/// Serve canned HTTP responses on a local port, one per connection, in order.
///
/// Returns the base URL and a handle yielding the request line of every
/// request served.
pub fn serve(responses: Vec<(u16, String)>) -> (String, std::thread::JoinHandle<Vec<String>>) {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/produtos", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            request_lines.push(request_line.trim_end().to_string());
            loop {
                let mut header = String::new();
                let n = reader.read_line(&mut header).unwrap();
                if n == 0 || header == "\r\n" {
                    break;
                }
            }

            let reason = if status < 400 { "OK" } else { "Error" };
            write!(
                stream,
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        }
        request_lines
    });

    (url, handle)
}
