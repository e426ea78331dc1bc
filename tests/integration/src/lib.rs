//! Integration test utilities for sandbox provisioning
//!
//! This crate provides a fake sandbox REST server and a fake forward proxy,
//! plus helpers for running end-to-end tests against them, and against the
//! real service when enabled.

pub mod fixtures;
pub mod helpers;

pub use fake_server::{FakeProxy, FakeSandbox};
pub use fixtures::*;
pub use helpers::*;
