use std::time::Duration;

use b3od_lib::{B3Client, B3Error, Backend, DateSelection, FetchConfig, Value};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> B3Client {
    B3Client::new(FetchConfig {
        connect_retries: 1,
        backoff_factor: 0.0,
        backoff_max: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        concurrency: 2,
        ..FetchConfig::with_base_url(&server.uri())
    })
}

/// Mounts a one-page economic indicator table for `date` with `rows` rows.
async fn mount_single_page(server: &MockServer, date: &str, rows: usize) {
    let values: Vec<_> = (0..rows)
        .map(|i| json!([date, "DI1", format!("DI1F{}", 22 + i), "Taxa DI", 6.15]))
        .collect();
    let body = json!({
        "pageCount": 1,
        "columns": [
            {"name": "RptDt"}, {"name": "Asst"}, {"name": "TckrSymb"},
            {"name": "EcncIndDesc"}, {"name": "PricVal"}
        ],
        "values": values
    });
    Mock::given(method("GET"))
        .and(path(format!(
            "/tabelas/table/EconomicIndicatorPrice/{}/1",
            date
        )))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .mount(server)
        .await;
}

async fn expect_no_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn unknown_table_sends_nothing() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let err = client(&server)
        .download("NoSuchTable", "2021-09-28")
        .await
        .unwrap_err();
    match err {
        B3Error::UnknownTable { table, available } => {
            assert_eq!(table, "NoSuchTable");
            assert!(available.contains("EconomicIndicatorPrice"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn invalid_date_sends_nothing() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let client = client(&server);
    let err = client
        .download("EconomicIndicatorPrice", "28/09/2021")
        .await
        .unwrap_err();
    assert!(matches!(err, B3Error::InvalidDate(_)));

    let err = client
        .download(
            "EconomicIndicatorPrice",
            vec!["2021-09-27", "not a date", "2021-09-29"],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, B3Error::InvalidDate(_)));
}

#[tokio::test]
async fn position_limits_have_no_pages() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let err = client(&server)
        .download_with("PositionLimits", "2021-09-28", Backend::Pages)
        .await
        .unwrap_err();
    assert!(matches!(err, B3Error::UnsupportedBackend { .. }));
}

#[tokio::test]
async fn single_date_uses_pages_by_default() {
    let server = MockServer::start().await;
    mount_single_page(&server, "2021-09-28", 3).await;

    let frame = client(&server)
        .economic_indicators(NaiveDate::from_ymd_opt(2021, 9, 28).unwrap())
        .await
        .unwrap();
    assert_eq!(frame.len(), 3);
    assert_eq!(frame.rows()[2][2], Value::Text("DI1F24".into()));
}

#[tokio::test]
async fn many_dates_are_stacked() {
    let server = MockServer::start().await;
    let dates = ["2021-09-27", "2021-09-28", "2021-09-29"];
    for date in dates {
        mount_single_page(&server, date, 2).await;
    }

    let frame = client(&server)
        .download("EconomicIndicatorPrice", DateSelection::many(dates))
        .await
        .unwrap();
    assert_eq!(frame.len(), 6);

    let report_dates: Vec<NaiveDate> = frame
        .column("RptDt")
        .unwrap()
        .filter_map(Value::as_date)
        .collect();
    let expected: Vec<NaiveDate> = dates
        .iter()
        .flat_map(|d| {
            let d = NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
            [d, d]
        })
        .collect();
    assert_eq!(report_dates, expected);
}

#[tokio::test]
async fn one_failing_date_fails_the_call() {
    let server = MockServer::start().await;
    mount_single_page(&server, "2021-09-27", 2).await;
    Mock::given(method("GET"))
        .and(path("/tabelas/table/EconomicIndicatorPrice/2021-09-28/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_single_page(&server, "2021-09-29", 2).await;

    let err = client(&server)
        .download(
            "EconomicIndicatorPrice",
            vec!["2021-09-27", "2021-09-28", "2021-09-29"],
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn download_backend_uses_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/requestname"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"redirectUrl": "~/download/?token=t"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "Status do Arquivo: Final\nRptDt;Asst;TckrSymb;EcncIndDesc;PricVal\n2021-09-28;DI1;DI1F22;Taxa DI;6,15\n",
            "text/csv",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let frame = client(&server)
        .download_with("EconomicIndicatorPrice", "20210928", Backend::Download)
        .await
        .unwrap();
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.rows()[0][4], Value::Float(6.15));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = B3Client::new(FetchConfig {
        connect_retries: 1,
        backoff_factor: 0.0,
        ..FetchConfig::with_base_url(&format!("http://127.0.0.1:{}", port))
    });

    let err = client
        .download("EconomicIndicatorPrice", "2021-09-28")
        .await
        .unwrap_err();
    assert!(err.is_transport());
}
