//! Proxy routing tests
//!
//! Kept in their own test binary: they set process-wide proxy variables,
//! which reqwest reads once per process.
//!
//! Run with: cargo test -p integration-tests --test proxy_tests

use ablytest_common::SandboxSettings;
use ablytest_sandbox::{HttpRequest, StatusCode};
use integration_tests::{init_test_tracing, plain_client, FakeProxy};

#[test]
fn test_requests_follow_proxy_variables() {
    init_test_tracing();
    let proxy = FakeProxy::start().expect("Failed to start fake proxy");

    // Must happen before the first client in this process is built.
    for name in ["HTTP_PROXY", "http_proxy"] {
        std::env::set_var(name, proxy.url());
    }
    for name in ["NO_PROXY", "no_proxy", "REQUEST_METHOD"] {
        std::env::remove_var(name);
    }

    let settings = SandboxSettings::from_env();
    assert_eq!(settings.network.proxy, Some(proxy.url()));

    let client = plain_client(&settings).expect("Client");
    assert!(!client.tls_verification_enabled());

    let response = client
        .execute(HttpRequest::get("http://sandbox-rest.proxied.invalid/time"))
        .expect("Request should go through the proxy");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"proxied");
    assert_eq!(
        proxy.requests(),
        ["GET http://sandbox-rest.proxied.invalid/time"]
    );
}
