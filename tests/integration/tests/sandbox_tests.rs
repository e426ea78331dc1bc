//! Sandbox provisioning integration tests
//!
//! Most tests run against the in-process fake sandbox. Tests against the real
//! service require:
//! - Network access to the sandbox environment
//! - Environment variables: ABLYTEST_LIVE (any value), optionally ABLY_ENV,
//!   ABLY_HOST, ABLY_PROTOCOL, HTTP_PROXY
//!
//! Run with: cargo test -p integration-tests --test sandbox_tests

use std::collections::HashSet;

use ablytest_common::{Protocol, SandboxSettings};
use ablytest_core::{AppFixture, Key, PRESENCE_FIXTURES_CHANNEL};
use ablytest_sandbox::{
    with_sandbox, ClientOptions, HttpRequest, Method, Recorder, Sandbox, SandboxGuard, StatusCode,
};
use integration_tests::{
    check_live_env, fake_sandbox, live_settings, plain_client, presence_fixture, two_key_fixture,
};

// ============================================================================
// Provisioning Tests
// ============================================================================

#[test]
fn test_provision_then_deprovision() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");

    let sandbox = Sandbox::provision(&settings, None).expect("Provision failed");
    let app_id = sandbox.fixture().app_id.clone();
    assert!(!app_id.is_empty());
    assert!(!sandbox.fixture().keys[0].value.is_empty());
    assert!(server.has_app(&app_id));

    sandbox.deprovision().expect("Deprovision failed");
    assert!(!server.has_app(&app_id));
    assert_eq!(server.app_count(), 0);

    // Nothing is left to delete the second time round.
    let err = sandbox.deprovision().unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not Found");
}

#[test]
fn test_provision_completes_default_fixture() {
    let (_server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let sandbox = Sandbox::provision(&settings, None).expect("Provision failed");
    let fixture = sandbox.fixture();

    assert_eq!(fixture.account_id, "fake-account");
    assert!(fixture.created_at().is_some());
    assert!(fixture.namespaces[0].persisted);

    let channel = fixture
        .channel(PRESENCE_FIXTURES_CHANNEL)
        .expect("Presence channel missing");
    assert_eq!(channel.presence.len(), 4);
    assert!(channel.member("client_json").is_some());

    let key = &fixture.keys[0];
    assert!(key.created_at().is_some());
    assert!(key.capability().allows("any-channel", "publish"));

    sandbox.deprovision().expect("Deprovision failed");
}

#[test]
fn test_provision_custom_fixture() {
    let (_server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let sandbox = Sandbox::provision(&settings, Some(two_key_fixture())).expect("Provision failed");
    let fixture = sandbox.fixture();

    assert_eq!(fixture.keys.len(), 2);
    assert!(fixture.labels.starts_with("two-keys-"));

    let restricted = fixture.keys[1].try_capability().expect("Capability should parse");
    assert!(restricted.allows("restricted:room", "subscribe"));
    assert!(!restricted.allows("restricted:room", "publish"));
    assert!(!restricted.allows("open", "subscribe"));

    // The first key is the one used for credentials.
    let (name, _) = sandbox.key_parts().expect("Key parts");
    assert_eq!(name, format!("{}.{}", fixture.app_id, fixture.keys[0].id));

    sandbox.deprovision().expect("Deprovision failed");
}

#[test]
fn test_provision_rejected_is_status_error() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    server.reject_next(StatusCode::UNAUTHORIZED);

    let err = Sandbox::provision(&settings, None).unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "Unauthorized");
    assert_eq!(server.app_count(), 0);
}

#[test]
fn test_provision_keyless_fixture_creates_nothing() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");

    let err = Sandbox::provision(&settings, Some(AppFixture::new())).unwrap_err();
    assert_eq!(err.error_code(), "MISSING_KEY");
    assert_eq!(server.created_count(), 0);
    assert_eq!(server.app_count(), 0);
}

#[test]
fn test_provision_incomplete_response_leaves_no_app() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    server.withhold_next_primary_secret();

    let err = Sandbox::provision(&settings, Some(two_key_fixture())).unwrap_err();
    assert_eq!(err.error_code(), "INCOMPLETE_FIXTURE");
    assert_eq!(server.created_count(), 1);
    assert_eq!(server.deleted_count(), 1);
    assert_eq!(server.app_count(), 0);
}

#[test]
fn test_provision_unreachable_endpoint_is_transport_error() {
    let settings = SandboxSettings::default().with_endpoint("http://127.0.0.1:9");
    let err = Sandbox::provision(&settings, None).unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn test_concurrent_provisioning() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let settings = settings.clone();
            std::thread::spawn(move || {
                with_sandbox(&settings, Some(presence_fixture(i + 1)), |sandbox| {
                    let members = sandbox.fixture().channels[0].presence.len();
                    (sandbox.fixture().app_id.clone(), members)
                })
            })
        })
        .collect();

    let mut app_ids = HashSet::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let (app_id, members) = handle
            .join()
            .expect("Provisioning thread panicked")
            .expect("Provisioning failed");
        assert_eq!(members, i + 1);
        app_ids.insert(app_id);
    }

    assert_eq!(app_ids.len(), 4);
    assert_eq!(server.created_count(), 4);
    assert_eq!(server.app_count(), 0);
}

// ============================================================================
// Credential Tests
// ============================================================================

#[test]
fn test_key_matches_server_credentials() {
    let (_server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let sandbox = Sandbox::provision(&settings, None).expect("Provision failed");
    let fixture = sandbox.fixture();

    let (name, secret) = sandbox.key_parts().expect("Key parts");
    assert_eq!(name, format!("{}.{}", fixture.app_id, fixture.keys[0].id));
    assert_eq!(secret, fixture.keys[0].value);
    assert_eq!(sandbox.key().expect("Key"), format!("{name}:{secret}"));

    sandbox.deprovision().expect("Deprovision failed");
}

#[test]
fn test_deprovision_with_wrong_secret_is_rejected() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let sandbox = Sandbox::provision(&settings, None).expect("Provision failed");

    let mut forged = sandbox.fixture().clone();
    forged.keys[0].value = "wrong".to_string();
    let impostor = Sandbox::attach(&settings, forged).expect("Attach failed");

    let err = impostor.deprovision().unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert!(server.has_app(&sandbox.fixture().app_id));

    sandbox.deprovision().expect("Deprovision failed");
}

#[test]
fn test_deprovision_without_keys_never_calls_server() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let mut fixture = AppFixture::new();
    fixture.app_id = "missing".to_string();
    let sandbox = Sandbox::attach(&settings, fixture).expect("Attach failed");

    let err = sandbox.deprovision().unwrap_err();
    assert_eq!(err.error_code(), "MISSING_KEY");
    assert_eq!(server.deleted_count(), 0);
}

// ============================================================================
// Client Options Tests
// ============================================================================

#[test]
fn test_options_merge_onto_sandbox_base() {
    let (_server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let sandbox = Sandbox::provision(&settings, None).expect("Provision failed");

    let options = sandbox
        .options(&[ClientOptions::new().with_protocol(Protocol::Json)])
        .expect("Options");
    assert_eq!(options.environment.as_deref(), Some("sandbox"));
    assert_eq!(options.protocol, Some(Protocol::Json));
    assert_eq!(options.auth.key, Some(sandbox.key().expect("Key")));

    let options = sandbox
        .options(&[
            ClientOptions::new().with_client_id("first"),
            ClientOptions::new().with_client_id(""),
        ])
        .expect("Options");
    assert_eq!(options.auth.client_id.as_deref(), Some(""));
    assert_eq!(options.protocol, None);

    sandbox.deprovision().expect("Deprovision failed");
}

#[test]
fn test_recorder_hijacks_sandbox_client() {
    let (_server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let sandbox = Sandbox::provision(&settings, None).expect("Provision failed");

    let recorder = Recorder::new(sandbox.http_client());
    let options = sandbox
        .options(&[recorder.options("localhost")])
        .expect("Options");

    assert_eq!(options.rest_host.as_deref(), Some("localhost"));
    assert_eq!(options.realtime_host.as_deref(), Some("localhost"));
    assert_eq!(options.auth.key, Some(sandbox.key().expect("Key")));

    let client = options.http_client.expect("Merged client");
    assert!(client.tls_verification_enabled());

    let response = client
        .execute(HttpRequest::get(sandbox.url(&["time"]).expect("URL")))
        .expect("Request failed");
    assert!(response.is_success());

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert!(recorder.hosts().contains("127.0.0.1"));

    sandbox.deprovision().expect("Deprovision failed");
}

#[test]
fn test_proxy_setting_disables_tls_verification() {
    let settings = SandboxSettings::from_lookup(|name: &str| match name {
        "HTTP_PROXY" => Some("http://127.0.0.1:8888".to_string()),
        _ => None,
    });
    let client = plain_client(&settings).expect("Client");
    assert!(!client.tls_verification_enabled());
    assert_eq!(client.proxy(), Some("http://127.0.0.1:8888"));

    let client = plain_client(&SandboxSettings::default()).expect("Client");
    assert!(client.tls_verification_enabled());
}

// ============================================================================
// Scoped Sandbox Tests
// ============================================================================

#[test]
fn test_guard_deprovisions_on_drop() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    {
        let guard = SandboxGuard::provision(&settings, None).expect("Provision failed");
        assert!(server.has_app(&guard.fixture().app_id));
    }
    assert_eq!(server.app_count(), 0);
    assert_eq!(server.deleted_count(), 1);
}

#[test]
fn test_guard_drop_after_manual_deprovision_does_not_panic() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let guard = SandboxGuard::provision(&settings, None).expect("Provision failed");
    guard.deprovision().expect("Deprovision failed");

    // The drop-time attempt gets a 404, which is only logged.
    drop(guard);
    assert_eq!(server.deleted_count(), 1);
}

#[test]
fn test_guard_release_reports_result() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let guard = SandboxGuard::provision(&settings, None).expect("Provision failed");
    guard.release().expect("Release failed");
    assert_eq!(server.app_count(), 0);
}

#[test]
fn test_with_sandbox_cleans_up() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let key = with_sandbox(&settings, None, |sandbox| sandbox.key())
        .expect("Sandbox failed")
        .expect("Key");
    assert!(key.contains(':'));
    assert_eq!(server.app_count(), 0);
}

#[test]
fn test_with_sandbox_cleans_up_after_panic() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    let result = std::panic::catch_unwind(|| {
        with_sandbox(&settings, None, |_sandbox| panic!("test body failed"))
    });
    assert!(result.is_err());
    assert_eq!(server.app_count(), 0);
}

#[test]
fn test_with_sandbox_reports_provision_failure() {
    let (server, settings) = fake_sandbox().expect("Failed to start fake sandbox");
    server.reject_next(StatusCode::INTERNAL_SERVER_ERROR);

    let mut ran = false;
    let err = with_sandbox(&settings, None, |_sandbox| ran = true).unwrap_err();
    assert!(!ran);
    assert_eq!(err.to_string(), "Internal Server Error");
}

// ============================================================================
// Live Sandbox Tests
// ============================================================================

#[test]
fn test_live_provision_roundtrip() {
    if !check_live_env() {
        return;
    }

    let settings = live_settings();
    let app_id = with_sandbox(&settings, None, |sandbox| {
        let fixture = sandbox.fixture();
        assert!(!fixture.keys[0].value.is_empty());
        assert!(sandbox.options(&[]).expect("Options").auth.key.is_some());
        fixture.app_id.clone()
    })
    .expect("Live sandbox failed");
    assert!(!app_id.is_empty());
}

#[test]
fn test_live_deprovision_unknown_app() {
    if !check_live_env() {
        return;
    }

    let settings = live_settings();
    let mut fixture = AppFixture::new().with_key(Key {
        id: "nokey".to_string(),
        value: "nosecret".to_string(),
        ..Key::default()
    });
    fixture.app_id = "doesnotexist".to_string();

    let sandbox = Sandbox::attach(&settings, fixture).expect("Attach failed");
    let err = sandbox.deprovision().unwrap_err();
    assert!(err.is_status());
}
