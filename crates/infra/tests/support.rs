//! Shared helpers for RDI integration tests

use std::sync::Once;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rdi_domain::{PollingConfig, RdiClientConfig, RdiInstance};
use rdi_infra::RdiApiClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const USERNAME: &str = "default";
pub const PASSWORD: &str = "password";

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("rdi_infra=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Unsigned JWT whose `exp` lies `seconds` from now (negative for the past).
pub fn jwt_expiring_in(seconds: i64) -> String {
    jwt_with_exp(Utc::now().timestamp() + seconds)
}

/// Unsigned JWT with an absolute `exp` timestamp.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": USERNAME, "exp": exp }).to_string());
    format!("{header}.{payload}.signature")
}

/// Client configuration with polling delays short enough for tests.
pub fn fast_config() -> RdiClientConfig {
    RdiClientConfig {
        request_timeout_ms: 5_000,
        polling: PollingConfig { wait_before_polling_ms: 1, interval_ms: 10, max_wait_ms: 2_000 },
        ..Default::default()
    }
}

pub fn client() -> RdiApiClient {
    init_tracing();
    RdiApiClient::new(&fast_config()).expect("client should build")
}

pub fn instance(server: &MockServer) -> RdiInstance {
    RdiInstance::new("rdi-1", server.uri(), USERNAME, PASSWORD)
}

/// `POST /login` carrying the test credentials
pub fn login_route() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": USERNAME, "password": PASSWORD })))
}

pub fn login_mock(token: &str) -> Mock {
    login_route()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": token })))
}

/// Accept any number of logins, each issuing a one hour token.
pub async fn mount_login(server: &MockServer) {
    login_mock(&jwt_expiring_in(3600)).mount(server).await;
}
