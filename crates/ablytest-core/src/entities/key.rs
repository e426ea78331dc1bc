//! Key entity - an API key issued to a sandbox application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{is_false, is_zero, is_zero_i32, millis_to_datetime};
use crate::error::CapabilityError;
use crate::value_objects::Capability;

/// API key. Empty on the request side; the server fills `id` and `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Key {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope_id: String,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub status: i32,
    #[serde(rename = "type", skip_serializing_if = "is_zero_i32")]
    pub key_type: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub created: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub modified: i64,
    #[serde(rename = "capability", skip_serializing_if = "String::is_empty")]
    pub raw_capability: String,
    #[serde(rename = "expired", skip_serializing_if = "is_zero")]
    pub expires: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub privileged: bool,
}

impl Key {
    /// Create a key request restricted to the given capability
    #[must_use]
    pub fn with_capability(capability: &Capability) -> Self {
        Self {
            raw_capability: capability.to_string(),
            ..Self::default()
        }
    }

    /// Parsed capability grant.
    ///
    /// A malformed or missing capability string yields an empty grant; use
    /// [`Key::try_capability`] to see the parse error.
    pub fn capability(&self) -> Capability {
        self.try_capability().unwrap_or_default()
    }

    /// Parsed capability grant, surfacing parse failures
    pub fn try_capability(&self) -> Result<Capability, CapabilityError> {
        Capability::parse(&self.raw_capability)
    }

    /// Check if the server has issued a secret for this key
    #[inline]
    pub fn is_issued(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.created)
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.modified)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.expires)
    }
}
