//! Transports and the hijack capability
//!
//! A transport may opt into being wrapped by an outside decorator (a request
//! recorder, typically) by returning itself from [`Transport::hijacker`]. The
//! options merger only ever asks for that capability; it never needs to know
//! which concrete transport it is dealing with.

use std::fmt;
use std::sync::Arc;

use ablytest_common::{AppResult, ConfigError, NetworkSettings, SandboxError};
use reqwest::blocking::Client;
use reqwest::Proxy;
use tracing::debug;

use crate::http::{HttpRequest, HttpResponse};

/// Executes a single request. No retries.
pub trait Transport: Send + Sync + fmt::Debug {
    fn round_trip(&self, request: HttpRequest) -> AppResult<HttpResponse>;

    /// Hijack capability; `None` unless the transport opts in
    fn hijacker(&self) -> Option<&dyn TransportHijacker> {
        None
    }
}

/// Wraps another transport, e.g. to observe the traffic going through it
pub trait TransportHijacker: Send + Sync {
    fn hijack(&self, base: Arc<dyn Transport>) -> Arc<dyn Transport>;
}

/// Blocking transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the client. Routing follows reqwest's proxy variable lookup
    /// (`HTTP_PROXY`, `HTTPS_PROXY`, `ALL_PROXY`, `NO_PROXY` and their
    /// lowercase forms); `network.proxy` only decides TLS verification.
    pub fn new(network: &NetworkSettings) -> AppResult<Self> {
        if let Some(proxy) = &network.proxy {
            // reqwest skips a malformed proxy variable silently.
            Proxy::http(proxy.as_str())
                .map_err(|e| ConfigError::InvalidValue("HTTP_PROXY", e.to_string()))?;
        }

        let client = Client::builder()
            .timeout(network.timeout)
            .connect_timeout(network.timeout)
            .tcp_keepalive(network.timeout)
            .pool_idle_timeout(network.timeout)
            .danger_accept_invalid_certs(network.proxy.is_some())
            .build()
            .map_err(SandboxError::transport)?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn round_trip(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self
            .client
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if let Some((username, password)) = request.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(SandboxError::transport)?;
        let status = response.status();
        let body = response.bytes().map_err(SandboxError::transport)?;

        debug!(status = status.as_u16(), "Received response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
