//! HTTP client factory
//!
//! Every client shares one timeout for connect, TLS handshake, keep-alive and
//! the whole request. Traffic follows the ambient proxy variables. When
//! `HTTP_PROXY` is set TLS certificate verification is also turned off, so a
//! local intercepting proxy can read the traffic. That coupling only exists
//! for test setups.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ablytest_common::{AppResult, NetworkSettings, SandboxError, REQUEST_TIMEOUT};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};

use crate::transport::{ReqwestTransport, Transport, TransportHijacker};

/// Transport-neutral HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub basic_auth: Option<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            basic_auth: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Host part of the URL, if it parses
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

/// Transport-neutral HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Anything up to and including 299 counts as success
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.as_u16() <= 299
    }

    /// Canonical reason phrase, or the bare code for unregistered statuses
    pub fn reason(&self) -> String {
        self.status
            .canonical_reason()
            .map_or_else(|| self.status.as_str().to_string(), str::to_string)
    }

    /// Turn a non-2xx response into a status error carrying only the reason
    pub fn error_for_status(self) -> AppResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SandboxError::status(self.status.as_u16(), self.reason()))
        }
    }
}

/// HTTP client: a transport plus the network policy it was built with
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    proxy: Option<String>,
    tls_verification: bool,
}

impl HttpClient {
    /// Build a client from network settings.
    ///
    /// TLS certificate verification is enabled exactly when no proxy is set.
    pub fn from_settings(network: &NetworkSettings) -> AppResult<Self> {
        let transport = ReqwestTransport::new(network)?;
        Ok(Self {
            transport: Arc::new(transport),
            timeout: network.timeout,
            proxy: network.proxy.clone(),
            tls_verification: network.proxy.is_none(),
        })
    }

    /// Wrap an arbitrary transport with the default network policy
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: REQUEST_TIMEOUT,
            proxy: None,
            tls_verification: true,
        }
    }

    /// Replace the transport, keeping timeout and TLS policy
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Hijack capability of the current transport, if it has one
    pub fn hijacker(&self) -> Option<&dyn TransportHijacker> {
        self.transport.hijacker()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn tls_verification_enabled(&self) -> bool {
        self.tls_verification
    }

    pub fn execute(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        self.transport.round_trip(request)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("transport", &self.transport)
            .field("timeout", &self.timeout)
            .field("proxy", &self.proxy)
            .field("tls_verification", &self.tls_verification)
            .finish()
    }
}
