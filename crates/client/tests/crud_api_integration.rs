//! Integration tests for the CRUD API client against a mock server
//!
//! **Coverage:**
//! - Happy path: config document → pooled client → API client → wire request
//! - Header contract: `my-header` present with the expected value
//! - Query + body contract: parameters and JSON body both on the wire
//! - Encoding: reserved characters survive a full round trip
//! - Timeout boundary: responses slower than the read timeout fail with
//!   `Timeout`, faster ones succeed
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates the member CRUD service)
//! - Real pooled `HttpClient` with scaled-down timeouts

use std::time::Duration;

use memberlink_client::{CrudApiClient, HttpClient, MY_HEADER};
use memberlink_domain::{Config, Member, MemberLinkError, PoolConfig, ServiceConfig};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn config_for(server: &MockServer) -> Config {
    Config { service: ServiceConfig { base_url: server.uri() }, pool: PoolConfig::default() }
}

fn api_client(config: &Config) -> CrudApiClient {
    let http = HttpClient::with_config(&config.pool).expect("http client");
    CrudApiClient::new(http, &config.service).expect("api client")
}

// ============================================================================
// Wire contract
// ============================================================================

#[tokio::test]
async fn submit_flow_carries_query_params_and_echoes_the_record() {
    let server = MockServer::start().await;
    let submitted = Member::new("flature!!", "flature@gmail.com", "Around Hub Studio");

    Mock::given(method("POST"))
        .and(path("/api/v1/crud-api"))
        .and(query_param("name", "Flature"))
        .and(query_param("email", "flature@wikibooks.co.kr"))
        .and(query_param("organization", "Wikibooks"))
        .and(body_json(&submitted))
        .respond_with(ResponseTemplate::new(200).set_body_json(&submitted))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&config_for(&server));
    let query = Member::new("Flature", "flature@wikibooks.co.kr", "Wikibooks");
    let envelope = client.submit_with_query_and_body(&query, &submitted).await.expect("envelope");

    assert_eq!(envelope.status.as_u16(), 200);
    assert_eq!(envelope.body, submitted);
}

#[tokio::test]
async fn custom_header_reaches_the_wire() {
    let server = MockServer::start().await;
    let body = Member::new("flature", "flature@wikibooks.co.kr", "Around Hub Studio");

    Mock::given(method("POST"))
        .and(path("/api/v1/crud-api/add-header"))
        .and(header(MY_HEADER, "Wikibooks API"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = api_client(&config_for(&server));
    let envelope = client.submit_with_header("Wikibooks API", &body).await.expect("envelope");

    assert_eq!(envelope.body, body);
}

#[tokio::test]
async fn path_variable_round_trips_reserved_characters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = api_client(&config_for(&server));
    let name = "around hub/studio";
    client.fetch_by_path_variable(name).await.expect("body");

    let requests = server.received_requests().await.expect("requests");
    let segment =
        requests[0].url.path_segments().and_then(|segments| segments.last()).expect("segment");
    assert_eq!(urlencoding::decode(segment).expect("decode"), name);
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test]
async fn slow_response_within_read_timeout_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/crud-api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("flature")
                .set_delay(Duration::from_millis(60)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.pool.read_timeout_ms = 500;

    let client = api_client(&config);
    assert_eq!(client.fetch_plain().await.expect("body"), "flature");
}

#[tokio::test]
async fn slow_response_beyond_read_timeout_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/crud-api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("flature")
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.pool.read_timeout_ms = 100;

    let client = api_client(&config);
    let result = client.fetch_plain().await;
    assert!(matches!(result, Err(MemberLinkError::Timeout(_))));
}
