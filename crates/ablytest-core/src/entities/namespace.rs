//! Namespace entity - channel namespace settings for a sandbox application

use serde::{Deserialize, Serialize};

use super::{is_false, is_zero};

/// Channel namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Namespace {
    pub id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub created: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub modified: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub persisted: bool,
}

impl Namespace {
    /// Create a namespace whose messages are not persisted
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Create a namespace with message persistence enabled
    pub fn persisted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            persisted: true,
            ..Self::default()
        }
    }
}
