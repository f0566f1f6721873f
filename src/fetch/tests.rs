use super::*;
use std::time::Duration;

use httptest::{all_of, cycle, matchers::*, responders::*, Expectation, Server};
use httptest::matchers::request;

use crate::config::ProxyRotation;
use crate::error_handling::{FetchError, ParseError};
use crate::input::ZipCode;
use crate::proxy::ProxyPool;

const AJAX_PATH: &str = "/san-antonio-tx/wp-admin/admin-ajax.php";
const CALCULATOR_PATH: &str = "/san-antonio-tx/storage-calculator/";
const QUOTE_BODY: &str = r#"{"success":true,"data":{"facility_name":"UNITS Test","pricing":{"total":"189.00","units":[{"size":"12ft","price":149}]}}}"#;

fn session_for(server: &Server) -> HttpSession {
    let options = SessionOptions {
        endpoint: url::Url::parse(&server.url_str(AJAX_PATH)).unwrap(),
        referer: server.url_str(CALCULATOR_PATH),
        request_timeout: Duration::from_secs(5),
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };
    HttpSession::new(options, ProxyPool::new(Vec::new(), ProxyRotation::RoundRobin)).unwrap()
}

fn zip() -> ZipCode {
    ZipCode::parse("78201").unwrap()
}

#[tokio::test]
async fn test_fetch_quote_success() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", AJAX_PATH),
            request::headers(contains(("x-requested-with", "XMLHttpRequest"))),
            request::body(url_decoded(contains(("action", "submit_quote_function")))),
            request::body(url_decoded(contains(("data[zip1]", "78201")))),
        ])
        .respond_with(status_code(200).body(QUOTE_BODY)),
    );

    let session = session_for(&server);
    let record = session.fetch_quote(&zip(), 1).await.unwrap();

    assert_eq!(record.zip_code, zip());
    assert_eq!(record.total_price, 189.0);
    assert_eq!(record.facility_name.as_deref(), Some("UNITS Test"));
    assert_eq!(record.unit_sizes, vec!["12ft"]);
    assert_eq!(session.refresh_count(), 0);
}

#[tokio::test]
async fn test_limit_reached_body_is_a_failure() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", AJAX_PATH))
            .respond_with(status_code(200).body(r#"{"success":false,"data":"limit_reached"}"#)),
    );

    let session = session_for(&server);
    let result = session.fetch_quote(&zip(), 1).await;
    assert!(matches!(
        result,
        Err(FetchError::Parse(ParseError::LimitReached))
    ));
}

#[tokio::test]
async fn test_server_error_is_a_failure() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", AJAX_PATH))
            .respond_with(status_code(502)),
    );

    let session = session_for(&server);
    match session.fetch_quote(&zip(), 1).await {
        Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 502),
        other => panic!("expected status failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_on_first_attempt_does_not_refresh() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", AJAX_PATH))
            .respond_with(status_code(403)),
    );

    let session = session_for(&server);
    assert!(session.fetch_quote(&zip(), 1).await.is_err());
    assert_eq!(session.refresh_count(), 0);
}

#[tokio::test]
async fn test_forbidden_on_second_attempt_refreshes_session() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", AJAX_PATH))
            .times(2)
            .respond_with(cycle![status_code(403), status_code(200).body(QUOTE_BODY)]),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", CALCULATOR_PATH))
            .respond_with(status_code(200).body("<html></html>")),
    );

    let session = session_for(&server);
    let first = session.fetch_quote(&zip(), 2).await;
    assert!(matches!(first, Err(FetchError::Status(_))));
    assert_eq!(session.refresh_count(), 1);

    // The rebuilt clients keep working
    assert!(session.fetch_quote(&zip(), 3).await.is_ok());
}

#[tokio::test]
async fn test_failed_warmup_is_not_fatal() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", CALCULATOR_PATH))
            .respond_with(status_code(500)),
    );

    let session = session_for(&server);
    session.refresh().await;
    assert_eq!(session.refresh_count(), 1);
}

#[tokio::test]
async fn test_connection_error_is_transport_failure() {
    let options = SessionOptions {
        // Port 9 (discard) on localhost is closed in test environments
        endpoint: url::Url::parse("http://127.0.0.1:9/ajax").unwrap(),
        referer: "http://127.0.0.1:9/calc/".to_string(),
        request_timeout: Duration::from_secs(2),
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };
    let session =
        HttpSession::new(options, ProxyPool::new(Vec::new(), ProxyRotation::RoundRobin)).unwrap();

    assert!(matches!(
        session.fetch_quote(&zip(), 1).await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_politeness_delay_within_bounds() {
    let options = SessionOptions {
        endpoint: url::Url::parse("http://127.0.0.1:9/ajax").unwrap(),
        referer: "http://127.0.0.1:9/calc/".to_string(),
        request_timeout: Duration::from_secs(2),
        min_delay: Duration::from_secs(3),
        max_delay: Duration::from_secs(10),
    };
    let session =
        HttpSession::new(options, ProxyPool::new(Vec::new(), ProxyRotation::RoundRobin)).unwrap();

    for _ in 0..10 {
        let start = tokio::time::Instant::now();
        let delay = session.politeness_delay().await;
        assert!(delay >= Duration::from_secs(3) && delay <= Duration::from_secs(10));
        assert!(start.elapsed() >= delay);
    }
}
