//! # ablytest-sandbox
//!
//! Provisions disposable applications on the sandbox REST API and derives
//! per-test client options from them.
//!
//! ```no_run
//! use ablytest_common::SandboxSettings;
//! use ablytest_sandbox::{ClientOptions, SandboxGuard};
//!
//! # fn main() -> Result<(), ablytest_common::SandboxError> {
//! let settings = SandboxSettings::from_env();
//! let sandbox = SandboxGuard::provision(&settings, None)?;
//!
//! let options = sandbox.options(&[ClientOptions::new().with_client_id("alice")])?;
//! assert!(options.auth.key.is_some());
//!
//! // Deprovisions here; dropping the guard would do the same.
//! sandbox.release()?;
//! # Ok(())
//! # }
//! ```
//!
//! All calls block the calling thread. Each [`Sandbox`] owns its fixture and
//! HTTP client, so independent sandboxes can be used from parallel tests.

mod guard;
mod http;
mod options;
mod recorder;
mod sandbox;
mod transport;

pub use guard::{with_sandbox, SandboxGuard};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use options::{apply_overrides, AuthOptions, ClientOptions};
pub use recorder::{RecordedRequest, Recorder};
pub use sandbox::Sandbox;
pub use transport::{ReqwestTransport, Transport, TransportHijacker};

pub use reqwest::{Method, StatusCode};
