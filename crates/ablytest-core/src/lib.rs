//! # ablytest-core
//!
//! Declarative description of a disposable sandbox application: keys, namespaces,
//! channels with seeded presence, and the capability grants carried by keys.
//! This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AppFixture, Channel, Connection, Key, Namespace, Presence, PRESENCE_FIXTURES_CHANNEL,
};
pub use error::CapabilityError;
pub use value_objects::Capability;
