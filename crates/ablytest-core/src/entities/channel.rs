//! Channel entity - a channel pre-created with seeded presence members

use serde::{Deserialize, Serialize};

/// Presence member seeded into a channel at provisioning time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Presence {
    pub client_id: String,
    pub data: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub encoding: String,
}

impl Presence {
    /// Create a presence member with unencoded data
    pub fn new(client_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            data: data.into(),
            encoding: String::new(),
        }
    }

    /// Set the data encoding (e.g. "json", "base64")
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }
}

/// Channel fixture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Channel {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub presence: Vec<Presence>,
}

impl Channel {
    /// Create a channel with no presence members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presence: Vec::new(),
        }
    }

    /// Append a presence member; order is preserved
    pub fn with_presence(mut self, member: Presence) -> Self {
        self.presence.push(member);
        self
    }

    /// Find a seeded member by client ID
    pub fn member(&self, client_id: &str) -> Option<&Presence> {
        self.presence.iter().find(|p| p.client_id == client_id)
    }
}
