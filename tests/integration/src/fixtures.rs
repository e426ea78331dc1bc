//! Test fixtures and data generators
//!
//! Provides reusable sandbox app descriptions for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use ablytest_core::{AppFixture, Capability, Channel, Key, Namespace, Presence};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A channel name that no other test in this binary uses
pub fn unique_channel(prefix: &str) -> String {
    format!("{prefix}-{}", unique_suffix())
}

/// Fixture with one unrestricted key and one key limited to a channel prefix
pub fn two_key_fixture() -> AppFixture {
    let restricted = Capability::new().grant("restricted:*", ["subscribe", "presence"]);
    AppFixture::default_fixture()
        .with_key(Key::with_capability(&restricted))
        .with_labels(format!("two-keys-{}", unique_suffix()))
}

/// Fixture with a single channel whose presence set holds `members` clients
pub fn presence_fixture(members: usize) -> AppFixture {
    let channel = (0..members).fold(
        Channel::new(unique_channel("persisted:presence")),
        |channel, i| channel.with_presence(Presence::new(format!("client_{i}"), "true")),
    );
    AppFixture::new()
        .with_key(Key::default())
        .with_namespace(Namespace::persisted("persisted"))
        .with_channel(channel)
}
