//! Common test utilities for fpl-dl integration tests

#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;

use fpl_dl::config::ApiConfig;
use fpl_dl::{Config, FplClient, HttpTransport};
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API config pointing every endpoint at the mock server
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/drf/", server.uri()),
        login_url: format!("{}/accounts/login/", server.uri()),
        login_redirect_uri: format!("{}/a/login", server.uri()),
        timeout: Duration::from_secs(5),
        ..ApiConfig::default()
    }
}

/// Anonymous client against the mock server with `workers` in flight
#[allow(dead_code)]
pub fn anonymous_client(server: &MockServer, workers: usize) -> FplClient<HttpTransport> {
    let mut config = Config {
        api: api_config(server),
        ..Config::default()
    };
    config.fan_out.max_workers = workers;
    let transport = HttpTransport::anonymous(&config.api).expect("transport");
    FplClient::new(transport, config).expect("client")
}

/// Serve `body` as JSON for GET `/drf/{endpoint}`
#[allow(dead_code)]
pub async fn mount_json(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/drf/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve one standings page of a classic league
#[allow(dead_code)]
pub async fn mount_standings_page(server: &MockServer, league: u32, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/drf/leagues-classic-standings/{league}")))
        .and(query_param("ls-page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Reply to GET `/drf/{endpoint}` with a bare status code
#[allow(dead_code)]
pub async fn mount_status(server: &MockServer, endpoint: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/drf/{endpoint}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
