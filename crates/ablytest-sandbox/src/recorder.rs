//! Request recorder
//!
//! A transport that logs every request before forwarding it. It supports
//! hijacking, so handing its options to [`crate::Sandbox::options`] records the
//! sandbox client's traffic without replacing that client's timeouts or TLS
//! policy.

use std::collections::BTreeSet;
use std::sync::Arc;

use ablytest_common::AppResult;
use parking_lot::Mutex;
use reqwest::Method;

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::options::ClientOptions;
use crate::transport::{Transport, TransportHijacker};

/// A request seen by a [`Recorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub host: Option<String>,
}

/// Recording transport. Clones and hijacked copies share one log.
#[derive(Debug, Clone)]
pub struct Recorder {
    log: Arc<Mutex<Vec<RecordedRequest>>>,
    inner: Arc<dyn Transport>,
}

impl Recorder {
    /// Record requests, forwarding them through `client`'s transport
    pub fn new(client: &HttpClient) -> Self {
        Self {
            log: Arc::default(),
            inner: client.transport(),
        }
    }

    /// Client options that route through this recorder and point both the
    /// REST and realtime hosts at `host`
    pub fn options(&self, host: &str) -> ClientOptions {
        ClientOptions::new()
            .with_rest_host(host)
            .with_realtime_host(host)
            .with_http_client(HttpClient::from_transport(Arc::new(self.clone())))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().clone()
    }

    /// Distinct hosts requests were sent to
    pub fn hosts(&self) -> BTreeSet<String> {
        self.log
            .lock()
            .iter()
            .filter_map(|r| r.host.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl Transport for Recorder {
    fn round_trip(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        self.log.lock().push(RecordedRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            host: request.host(),
        });
        self.inner.round_trip(request)
    }

    fn hijacker(&self) -> Option<&dyn TransportHijacker> {
        Some(self)
    }
}

impl TransportHijacker for Recorder {
    fn hijack(&self, base: Arc<dyn Transport>) -> Arc<dyn Transport> {
        Arc::new(Self {
            log: Arc::clone(&self.log),
            inner: base,
        })
    }
}
