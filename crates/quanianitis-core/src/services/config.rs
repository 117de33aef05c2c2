/// Configuration resolver - turns raw provider configuration into a usable one
use crate::constants::{
    ATTR_ENDPOINT, ATTR_IDENTITY_TOKEN, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS,
    IDENTITY_TOKEN_ENV, REQUEST_TIMEOUT_ENV,
};
use crate::error::QuanianitisError;
use crate::models::{ProviderConfig, RawProviderConfig};
use std::time::Duration;
use tracing::debug;
use typed_builder::TypedBuilder;
use url::Url;

/// Settings for the outbound HTTP client
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ClientSettings {
    #[builder(default = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))]
    pub timeout: Duration,

    #[builder(default = format!("terraform-provider-quanianitis/{}", crate::VERSION), setter(into))]
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientSettings {
    /// Loads settings from `QUANIANITIS_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, QuanianitisError> {
        Self::from_timeout_value(std::env::var(REQUEST_TIMEOUT_ENV).ok().as_deref())
    }

    /// Builds settings from an optional timeout override in whole seconds
    pub fn from_timeout_value(value: Option<&str>) -> Result<Self, QuanianitisError> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(Self::default());
        };

        let secs: u64 = raw.parse().map_err(|_| {
            QuanianitisError::InvalidConfig(format!(
                "{} must be a whole number of seconds, got '{}'",
                REQUEST_TIMEOUT_ENV, raw
            ))
        })?;
        if secs == 0 {
            return Err(QuanianitisError::InvalidConfig(format!(
                "{} must be greater than zero",
                REQUEST_TIMEOUT_ENV
            )));
        }

        Ok(Self::builder().timeout(Duration::from_secs(secs)).build())
    }
}

/// Resolves provider configuration against an explicitly supplied
/// environment token
#[derive(Clone, Default)]
pub struct ConfigResolver {
    env_token: Option<String>,
}

impl ConfigResolver {
    pub fn new(env_token: Option<String>) -> Self {
        Self { env_token }
    }

    /// Captures `GCLOUD_IDENTITY_TOKEN` from the process environment
    pub fn from_env() -> Self {
        Self::new(std::env::var(IDENTITY_TOKEN_ENV).ok())
    }

    /// Resolves the endpoint and identity token
    ///
    /// Unknown values fail with `ConfigIncomplete` so the caller can retry once
    /// planning settles them. An explicit token wins over the environment; a
    /// missing endpoint falls back to the default relay.
    pub fn resolve(&self, raw: &RawProviderConfig) -> Result<ProviderConfig, QuanianitisError> {
        if raw.endpoint.is_unknown() {
            return Err(QuanianitisError::ConfigIncomplete(ATTR_ENDPOINT.to_string()));
        }
        if raw.gcloud_identity_token.is_unknown() {
            return Err(QuanianitisError::ConfigIncomplete(
                ATTR_IDENTITY_TOKEN.to_string(),
            ));
        }

        let explicit_token = raw.gcloud_identity_token.non_blank();
        let token_source = if explicit_token.is_some() {
            "config"
        } else {
            "environment"
        };

        let identity_token = explicit_token
            .or_else(|| {
                self.env_token
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
            })
            .ok_or(QuanianitisError::MissingCredential)?
            .to_string();

        let endpoint = parse_endpoint(raw.endpoint.non_blank().unwrap_or(DEFAULT_ENDPOINT))?;

        debug!(
            endpoint = %endpoint,
            token_source,
            "Resolved provider configuration"
        );

        Ok(ProviderConfig {
            endpoint,
            identity_token,
        })
    }
}

fn parse_endpoint(value: &str) -> Result<Url, QuanianitisError> {
    let url = Url::parse(value).map_err(|e| {
        QuanianitisError::InvalidConfig(format!("endpoint '{}' is not a valid URL: {}", value, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(QuanianitisError::InvalidConfig(format!(
            "endpoint scheme must be http or https, got '{}'",
            scheme
        ))),
    }
}
