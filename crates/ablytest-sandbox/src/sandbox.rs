//! Sandbox provisioner
//!
//! `POST {rest}/apps` creates an application from a fixture, `DELETE
//! {rest}/apps/{appId}` removes it again. Each call is a single blocking
//! attempt; failures are returned to the caller unchanged.

use ablytest_common::{AppResult, ConfigError, SandboxError, SandboxSettings};
use ablytest_core::AppFixture;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use tracing::{info, warn};

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::options::{apply_overrides, AuthOptions, ClientOptions};

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// A provisioned application plus the client used to manage it
#[derive(Debug)]
pub struct Sandbox {
    fixture: AppFixture,
    settings: SandboxSettings,
    client: HttpClient,
}

impl Sandbox {
    /// Provision `fixture`, or the built-in default fixture when `None`
    pub fn provision(settings: &SandboxSettings, fixture: Option<AppFixture>) -> AppResult<Self> {
        let client = HttpClient::from_settings(&settings.network)?;
        Self::provision_with_client(settings, fixture, client)
    }

    /// Provision through an already built client.
    ///
    /// A fixture without keys is refused before anything is sent: the app
    /// it would create could never be deprovisioned.
    pub fn provision_with_client(
        settings: &SandboxSettings,
        fixture: Option<AppFixture>,
        client: HttpClient,
    ) -> AppResult<Self> {
        let mut sandbox = Self {
            fixture: fixture.unwrap_or_else(AppFixture::default_fixture),
            settings: settings.clone(),
            client,
        };
        if sandbox.fixture.keys.is_empty() {
            return Err(SandboxError::MissingKey);
        }

        let body = serde_json::to_vec(&sandbox.fixture).map_err(SandboxError::Encode)?;
        let request = HttpRequest::post(sandbox.url(&["apps"])?)
            .header(CONTENT_TYPE, application_json())
            .header(ACCEPT, application_json())
            .body(body);

        let response = sandbox.client.execute(request)?.error_for_status()?;
        sandbox
            .fixture
            .absorb(&response.body)
            .map_err(SandboxError::Decode)?;

        if !sandbox.fixture.is_provisioned() {
            warn!(
                environment = %sandbox.settings.environment,
                app_id = %sandbox.fixture.app_id,
                "Sandbox response is missing an app ID or primary key secret"
            );
            sandbox.discard();
            return Err(SandboxError::Incomplete);
        }

        info!(
            environment = %sandbox.settings.environment,
            app_id = %sandbox.fixture.app_id,
            "Provisioned sandbox app"
        );
        Ok(sandbox)
    }

    /// Manage an application that was provisioned elsewhere
    pub fn attach(settings: &SandboxSettings, fixture: AppFixture) -> AppResult<Self> {
        Ok(Self {
            fixture,
            settings: settings.clone(),
            client: HttpClient::from_settings(&settings.network)?,
        })
    }

    /// Delete the application. A single attempt; on failure the sandbox is
    /// still usable, so the caller may try again.
    pub fn deprovision(&self) -> AppResult<()> {
        let (name, secret) = self.key_parts()?;
        self.delete_app(name, secret)
    }

    /// One attempt to remove an app whose provisioning response was rejected,
    /// authenticating with whichever key did come back with a secret.
    fn discard(&self) {
        if self.fixture.app_id.is_empty() {
            return;
        }
        let Some(key) = self.fixture.keys.iter().find(|k| k.is_issued()) else {
            warn!(
                app_id = %self.fixture.app_id,
                "No key secret to deprovision with, sandbox app left behind"
            );
            return;
        };
        let name = format!("{}.{}", self.fixture.app_id, key.id);
        // Failures are logged by delete_app.
        self.delete_app(name, key.value.clone()).ok();
    }

    fn delete_app(&self, name: String, secret: String) -> AppResult<()> {
        let request =
            HttpRequest::delete(self.url(&["apps", &self.fixture.app_id])?).basic_auth(name, secret);

        if let Err(err) = self.client.execute(request).and_then(HttpResponse::error_for_status) {
            warn!(app_id = %self.fixture.app_id, error = %err, "Failed to deprovision sandbox app");
            return Err(err);
        }

        info!(app_id = %self.fixture.app_id, "Deprovisioned sandbox app");
        Ok(())
    }

    /// Key name (`appId.keyId`) and secret of the first key
    pub fn key_parts(&self) -> AppResult<(String, String)> {
        let key = self.fixture.primary_key().ok_or(SandboxError::MissingKey)?;
        Ok((format!("{}.{}", self.fixture.app_id, key.id), key.value.clone()))
    }

    /// Full API key, `name:secret`
    pub fn key(&self) -> AppResult<String> {
        let (name, secret) = self.key_parts()?;
        Ok(format!("{name}:{secret}"))
    }

    /// Client options for this sandbox with `overrides` merged on top.
    ///
    /// The base carries the environment, protocol preference, a fresh HTTP
    /// client and the sandbox key. See [`apply_overrides`] for the merge rules.
    pub fn options(&self, overrides: &[ClientOptions]) -> AppResult<ClientOptions> {
        let base = ClientOptions {
            environment: Some(self.settings.environment.clone()),
            protocol: self.settings.protocol.clone(),
            http_client: Some(HttpClient::from_settings(&self.settings.network)?),
            auth: AuthOptions {
                key: Some(self.key()?),
                ..AuthOptions::default()
            },
            ..ClientOptions::default()
        };
        Ok(apply_overrides(&base, overrides))
    }

    /// REST URL for the given path segments. Empty segments are skipped,
    /// the others are percent-encoded.
    pub fn url(&self, segments: &[&str]) -> AppResult<String> {
        let base = self.settings.rest_base_url();
        let invalid = || {
            let source = if self.settings.endpoint.is_some() {
                "ABLY_SANDBOX_ENDPOINT"
            } else {
                "ABLY_ENV/ABLY_HOST"
            };
            ConfigError::InvalidValue(source, base.clone())
        };

        let mut url = Url::parse(&base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments.iter().copied().filter(|s| !s.is_empty()));
        Ok(url.into())
    }

    pub fn fixture(&self) -> &AppFixture {
        &self.fixture
    }

    pub fn environment(&self) -> &str {
        &self.settings.environment
    }

    pub fn settings(&self) -> &SandboxSettings {
        &self.settings
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.client
    }
}
