//! Capability grants
//!
//! A capability is written as a compact JSON object mapping a resource (a channel
//! name, a `prefix*` pattern, or the `*` wildcard) to the operations allowed on it:
//!
//! ```text
//! {"persisted:*":["subscribe","history"],"*":["publish"]}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CapabilityError;

/// Wildcard matching any resource or any operation
const WILDCARD: &str = "*";

/// Structured permission set parsed from a capability string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability {
    grants: BTreeMap<String, Vec<String>>,
}

impl Capability {
    /// Create an empty grant
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a capability string
    pub fn parse(raw: &str) -> Result<Self, CapabilityError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CapabilityError::Empty);
        }

        let grants: BTreeMap<String, Vec<String>> = serde_json::from_str(raw)?;
        if let Some((resource, _)) = grants.iter().find(|(_, ops)| ops.is_empty()) {
            return Err(CapabilityError::NoOperations(resource.clone()));
        }

        Ok(Self { grants })
    }

    /// Grant `operations` on `resource`, merging with anything already granted
    pub fn grant<I, S>(mut self, resource: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ops = self.grants.entry(resource.into()).or_default();
        for op in operations {
            let op = op.into();
            if !ops.contains(&op) {
                ops.push(op);
            }
        }
        self
    }

    /// Check whether `operation` is allowed on `resource`
    pub fn allows(&self, resource: &str, operation: &str) -> bool {
        self.grants.iter().any(|(pattern, ops)| {
            resource_matches(pattern, resource)
                && ops.iter().any(|op| op == WILDCARD || op == operation)
        })
    }

    /// Operations granted on exactly this resource pattern
    pub fn operations(&self, resource: &str) -> Option<&[String]> {
        self.grants.get(resource).map(Vec::as_slice)
    }

    /// Resource patterns in the grant
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.grants.keys().map(String::as_str)
    }

    /// Check if the grant is empty
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

fn resource_matches(pattern: &str, resource: &str) -> bool {
    if pattern == WILDCARD || pattern == resource {
        return true;
    }
    pattern
        .strip_suffix(WILDCARD)
        .is_some_and(|prefix| resource.starts_with(prefix))
}

impl FromStr for Capability {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(&self.grants).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}
