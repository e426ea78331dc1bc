//! AppFixture entity - the aggregate describing a disposable sandbox application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{is_false, is_zero, is_zero_i32, millis_to_datetime};
use super::{Channel, Connection, Key, Namespace, Presence};

/// Name of the channel seeded by [`AppFixture::default_fixture`]
pub const PRESENCE_FIXTURES_CHANNEL: &str = "persisted:presence_fixtures";

/// Sandbox application description.
///
/// Built by the caller, then completed in place by the server response on
/// provisioning: `app_id`, `account_id`, timestamps, and key IDs and secrets
/// are only known after that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppFixture {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub app_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub status: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub created: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub modified: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub tls_only: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub labels: String,
    pub keys: Vec<Key>,
    pub namespaces: Vec<Namespace>,
    pub channels: Vec<Channel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,
}

impl AppFixture {
    /// Create an empty fixture with no keys, namespaces or channels
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in fixture used when the caller supplies none: one key with
    /// server-chosen settings, one persisted namespace, and a channel seeded
    /// with four presence members carrying differently shaped data.
    #[must_use]
    pub fn default_fixture() -> Self {
        Self::new()
            .with_key(Key::default())
            .with_namespace(Namespace::persisted("persisted"))
            .with_channel(
                Channel::new(PRESENCE_FIXTURES_CHANNEL)
                    .with_presence(Presence::new("client_bool", "true"))
                    .with_presence(Presence::new("client_int", "true"))
                    .with_presence(Presence::new("client_string", "true"))
                    .with_presence(Presence::new(
                        "client_json",
                        r#"{"test": "This is a JSONObject clientData payload"}"#,
                    )),
            )
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Require TLS for every connection to the application
    pub fn tls_only(mut self) -> Self {
        self.tls_only = true;
        self
    }

    /// Labels are a free-form string attached to the application
    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = labels.into();
        self
    }

    /// First key, the one credentials are derived from
    #[inline]
    pub fn primary_key(&self) -> Option<&Key> {
        self.keys.first()
    }

    /// Check that the server has assigned an app ID and issued the primary
    /// key's secret
    pub fn is_provisioned(&self) -> bool {
        !self.app_id.is_empty() && self.primary_key().is_some_and(Key::is_issued)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.created)
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.modified)
    }

    /// Decode a server response into this fixture.
    ///
    /// Fields present in the response replace the current values, fields the
    /// response leaves out keep what the caller set. Lists are merged element
    /// by element and take the length of the response list, so a key keeps its
    /// requested capability when the server echoes only its ID and secret.
    /// On error the fixture is left untouched.
    pub fn absorb(&mut self, body: &[u8]) -> Result<(), serde_json::Error> {
        let patch: Value = serde_json::from_slice(body)?;
        let mut current = serde_json::to_value(&*self)?;
        overlay(&mut current, patch);
        *self = serde_json::from_value(current)?;
        Ok(())
    }
}

fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(patch)) => {
            for (field, value) in patch {
                overlay(base.entry(field).or_insert(Value::Null), value);
            }
        }
        (Value::Array(base), Value::Array(patch)) => {
            base.truncate(patch.len());
            for (i, value) in patch.into_iter().enumerate() {
                match base.get_mut(i) {
                    Some(slot) => overlay(slot, value),
                    None => base.push(value),
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
