//! Scoped sandbox ownership
//!
//! A [`SandboxGuard`] deprovisions its sandbox when it goes out of scope,
//! including while a failing test unwinds. Nothing is cleaned up at process
//! exit; a sandbox leaked with `std::mem::forget` stays on the server.

use std::ops::Deref;

use ablytest_common::{AppResult, SandboxSettings};
use ablytest_core::AppFixture;
use tracing::warn;

use crate::sandbox::Sandbox;

/// Owns a [`Sandbox`] and deprovisions it on drop
#[derive(Debug)]
pub struct SandboxGuard {
    sandbox: Sandbox,
    armed: bool,
}

impl SandboxGuard {
    pub fn new(sandbox: Sandbox) -> Self {
        Self {
            sandbox,
            armed: true,
        }
    }

    /// Provision a sandbox and guard it
    pub fn provision(settings: &SandboxSettings, fixture: Option<AppFixture>) -> AppResult<Self> {
        Sandbox::provision(settings, fixture).map(Self::new)
    }

    /// Deprovision now and report the outcome. The guard will not try again on drop.
    pub fn release(mut self) -> AppResult<()> {
        self.armed = false;
        self.sandbox.deprovision()
    }
}

impl Deref for SandboxGuard {
    type Target = Sandbox;

    fn deref(&self) -> &Sandbox {
        &self.sandbox
    }
}

impl Drop for SandboxGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = self.sandbox.deprovision() {
            warn!(
                app_id = %self.sandbox.fixture().app_id,
                error = %err,
                "Sandbox app leaked: deprovision on drop failed"
            );
        }
    }
}

/// Provision a sandbox, run `f` with it, and deprovision it afterwards.
///
/// The sandbox is deprovisioned even if `f` panics. A deprovision failure is
/// returned once `f` has completed.
pub fn with_sandbox<T, F>(
    settings: &SandboxSettings,
    fixture: Option<AppFixture>,
    f: F,
) -> AppResult<T>
where
    F: FnOnce(&Sandbox) -> T,
{
    let guard = SandboxGuard::provision(settings, fixture)?;
    let output = f(&guard);
    guard.release()?;
    Ok(output)
}
