//! Test helpers for integration tests
//!
//! Provides settings for the fake sandbox, environment checks for the live
//! tests, and one-time tracing setup.

use ablytest_common::{try_init_tracing, SandboxSettings};
use ablytest_sandbox::HttpClient;
use anyhow::Result;

use crate::fake_server::FakeSandbox;

/// Variable that opts into tests against the real sandbox service
pub const LIVE_TEST_VAR: &str = "ABLYTEST_LIVE";

/// Install the test tracing subscriber once per test binary
pub fn init_test_tracing() {
    // Later calls find a subscriber already installed.
    try_init_tracing().ok();
}

/// Start a fake sandbox and settings pointing at it
pub fn fake_sandbox() -> Result<(FakeSandbox, SandboxSettings)> {
    init_test_tracing();
    let server = FakeSandbox::start()?;
    let settings = SandboxSettings::default().with_endpoint(server.base_url());
    Ok((server, settings))
}

/// HTTP client for talking to the fake sandbox directly
pub fn plain_client(settings: &SandboxSettings) -> Result<HttpClient> {
    Ok(HttpClient::from_settings(&settings.network)?)
}

/// Settings for the live sandbox, read from the environment
pub fn live_settings() -> SandboxSettings {
    init_test_tracing();
    SandboxSettings::from_env()
}

/// Helper to check if the live test environment is enabled
pub fn check_live_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var(LIVE_TEST_VAR).is_err() {
        eprintln!("Skipping test: {LIVE_TEST_VAR} not set");
        return false;
    }

    true
}
