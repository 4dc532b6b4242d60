//! Integration tests for `QuickChecker` using wiremock HTTP mocks.

use vizaudit_webcheck::{QuickChecker, WebsiteChecker};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checker() -> QuickChecker {
    QuickChecker::new(5, "test-agent").expect("checker construction should not fail")
}

#[tokio::test]
async fn healthy_page_is_accessible_with_seo_signals() {
    let server = MockServer::start().await;

    let html = r#"<html><head>
        <title>Harbour Bakery</title>
        <meta name="description" content="Fresh bread daily">
        <meta property="og:title" content="Harbour Bakery">
    </head><body>Welcome</body></html>"#;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let analysis = checker().check(&server.uri()).await;

    assert!(analysis.accessible);
    assert!(analysis.has_meta_title);
    assert!(analysis.has_meta_description);
    assert!(analysis.has_og_tags);
    assert!(!analysis.has_schema_markup);
    // local mock: no ssl (20 skipped), title 25 + description 25 + og 15
    assert_eq!(analysis.seo_score, Some(65));
    assert!(analysis.speed_score.is_some());
    assert!(analysis.load_time_ms.is_some());
    assert!(analysis.error.is_none());
}

#[tokio::test]
async fn error_status_is_not_accessible() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let analysis = checker().check(&server.uri()).await;

    assert!(!analysis.accessible);
    assert_eq!(analysis.seo_score, None);
    assert_eq!(analysis.speed_score, None);
    assert!(analysis.error.is_none(), "a reachable server is not a check failure");
}

#[tokio::test]
async fn unreachable_host_degrades_instead_of_failing() {
    // Nothing listens on port 1; schemeless input is probed over https.
    let analysis = checker().check("127.0.0.1:1").await;

    assert!(!analysis.accessible);
    assert!(analysis.has_ssl, "degraded profile infers ssl from the requested scheme");
    assert_eq!(analysis.speed_score, None);
    assert_eq!(analysis.seo_score, None);
    assert!(analysis.error.is_some());
}

#[tokio::test]
async fn explicit_http_scheme_is_probed_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    // server.uri() is http://...; the checker must not rewrite it to https.
    let analysis = checker().check(&server.uri()).await;
    assert!(analysis.accessible);
    assert!(!analysis.has_ssl);
}
