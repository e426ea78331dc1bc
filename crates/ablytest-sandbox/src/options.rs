//! Client options and the options merger
//!
//! Every field is optional: `None` means "not set", so an override can set a
//! field to its zero value (an empty client ID, `tls = false`) and still win
//! the merge.

use ablytest_common::Protocol;

use crate::http::HttpClient;

/// Authentication part of [`ClientOptions`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthOptions {
    /// `name:secret` API key
    pub key: Option<String>,
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub use_token_auth: Option<bool>,
}

impl AuthOptions {
    /// Field-wise merge where values set in `other` win
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            key: pick(&self.key, &other.key),
            token: pick(&self.token, &other.token),
            client_id: pick(&self.client_id, &other.client_id),
            use_token_auth: pick(&self.use_token_auth, &other.use_token_auth),
        }
    }
}

/// Configuration handed to the messaging client
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub environment: Option<String>,
    pub protocol: Option<Protocol>,
    pub rest_host: Option<String>,
    pub realtime_host: Option<String>,
    pub tls: Option<bool>,
    pub http_client: Option<HttpClient>,
    pub auth: AuthOptions,
}

impl ClientOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_rest_host(mut self, host: impl Into<String>) -> Self {
        self.rest_host = Some(host.into());
        self
    }

    pub fn with_realtime_host(mut self, host: impl Into<String>) -> Self {
        self.realtime_host = Some(host.into());
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.auth.key = Some(key.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth.token = Some(token.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.auth.client_id = Some(client_id.into());
        self
    }

    pub fn with_token_auth(mut self, use_token_auth: bool) -> Self {
        self.auth.use_token_auth = Some(use_token_auth);
        self
    }

    /// Field-wise merge into a new value; fields set in `other` win.
    /// Neither input is modified.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            environment: pick(&self.environment, &other.environment),
            protocol: pick(&self.protocol, &other.protocol),
            rest_host: pick(&self.rest_host, &other.rest_host),
            realtime_host: pick(&self.realtime_host, &other.realtime_host),
            tls: pick(&self.tls, &other.tls),
            http_client: pick(&self.http_client, &other.http_client),
            auth: self.auth.merge(&other.auth),
        }
    }

    /// Merge left to right, starting from empty options
    pub fn merge_all<'a, I>(options: I) -> Self
    where
        I: IntoIterator<Item = &'a ClientOptions>,
    {
        options
            .into_iter()
            .fold(Self::default(), |acc, next| acc.merge(next))
    }
}

fn pick<T: Clone>(base: &Option<T>, other: &Option<T>) -> Option<T> {
    other.as_ref().or(base.as_ref()).cloned()
}

/// Merge caller overrides onto base options.
///
/// If the merged overrides carry an HTTP client whose transport can hijack,
/// the base client keeps its own settings and only its transport is replaced
/// by `hijack(base transport)`; the override client itself is dropped.
/// Otherwise this is a plain `base.merge(overrides...)`.
pub fn apply_overrides(base: &ClientOptions, overrides: &[ClientOptions]) -> ClientOptions {
    let mut base = base.clone();
    let mut requested = ClientOptions::merge_all(overrides);

    let hijacked = match (&base.http_client, &requested.http_client) {
        (Some(base_client), Some(requested_client)) => {
            requested_client.hijacker().map(|hijacker| {
                let transport = hijacker.hijack(base_client.transport());
                base_client.clone().with_transport(transport)
            })
        }
        _ => None,
    };

    if let Some(client) = hijacked {
        base.http_client = Some(client);
        requested.http_client = None;
    }

    base.merge(&requested)
}
