//! Client configuration: credentials, endpoint and request deadline.
//!
//! # Design
//! Everything the client injects into a request lives here and is fixed at
//! construction. Nothing in this module performs I/O except `from_env`,
//! which only reads process environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Production endpoint.
pub const PRODUCTION_URL: &str = "https://api.namecheap.com/xml.response";

/// Sandbox endpoint for testing against a throwaway account.
pub const SANDBOX_URL: &str = "https://api.sandbox.namecheap.com/xml.response";

/// The API requires a `ClientIp` field but does not check it.
pub const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// Account credentials injected into every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_user: String,
    pub api_key: String,
    pub username: String,
    pub client_ip: String,
}

impl Credentials {
    /// Credentials where the acting username is the API user, which is the
    /// common case.
    pub fn new(api_user: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_user = api_user.into();
        Self {
            username: api_user.clone(),
            api_user,
            api_key: api_key.into(),
            client_ip: DEFAULT_CLIENT_IP.to_string(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = client_ip.into();
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_user", &self.api_user)
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .field("client_ip", &self.client_ip)
            .finish()
    }
}

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    #[default]
    Production,
    Sandbox,
    Custom(String),
}

impl Endpoint {
    pub fn url(&self) -> &str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Sandbox => SANDBOX_URL,
            Self::Custom(url) => url,
        }
    }
}

/// Immutable configuration handed to `NamecheapClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub endpoint: Endpoint,
    /// Applied to each request; `None` leaves the transport's own default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: Endpoint::Production,
            timeout: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn sandbox(self) -> Self {
        self.with_endpoint(Endpoint::Sandbox)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a config from `NAMECHEAP_*` environment variables.
    ///
    /// `NAMECHEAP_API_USER` and `NAMECHEAP_API_KEY` are required.
    /// `NAMECHEAP_USERNAME` defaults to the API user, `NAMECHEAP_CLIENT_IP` to
    /// loopback. `NAMECHEAP_BASE_URL` wins over `NAMECHEAP_SANDBOX`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ApiError::configuration(format!("{key} is not set")))
        };

        let mut credentials = Credentials::new(
            required("NAMECHEAP_API_USER")?,
            required("NAMECHEAP_API_KEY")?,
        );
        if let Some(username) = lookup("NAMECHEAP_USERNAME").filter(|v| !v.is_empty()) {
            credentials = credentials.with_username(username);
        }
        if let Some(ip) = lookup("NAMECHEAP_CLIENT_IP").filter(|v| !v.is_empty()) {
            credentials = credentials.with_client_ip(ip);
        }

        let endpoint = if let Some(url) = lookup("NAMECHEAP_BASE_URL").filter(|v| !v.is_empty()) {
            Endpoint::Custom(url)
        } else if lookup("NAMECHEAP_SANDBOX").is_some_and(|v| is_truthy(&v)) {
            Endpoint::Sandbox
        } else {
            Endpoint::Production
        };

        Ok(Self::new(credentials).with_endpoint(endpoint))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
