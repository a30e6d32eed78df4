//! Application configuration loaded via OrthoConfig.
//!
//! Every field may come from `PODWATCH_*` environment variables or the
//! matching command-line flag. Numeric tuning knobs carry their defaults in
//! the derive; optional text fields fall back to the defaults exposed by the
//! accessors.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Settings read once at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PODWATCH")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Registered catalog application id.
    pub client_id: Option<String>,
    /// Registered catalog application secret.
    pub client_secret: Option<String>,
    /// Redirect URI registered with the provider.
    pub redirect_uri: Option<String>,
    /// Provider endpoint exchanging authorization codes for tokens.
    pub token_url: Option<String>,
    /// Provider consent page.
    pub authorize_url: Option<String>,
    /// Base URL of the catalog API; must end with `/`.
    pub api_base_url: Option<String>,
    /// Timeout in seconds applied to every outbound catalog request.
    #[ortho_config(default = 10)]
    pub http_timeout_secs: u64,
    /// Token cache lifetime in seconds; `0` disables caching.
    #[ortho_config(default = 300)]
    pub token_cache_ttl_secs: u64,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

/// Invalid or missing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A required setting was unset or blank.
    #[error("missing required setting PODWATCH_{name}")]
    Missing {
        /// Setting name without the prefix.
        name: &'static str,
    },
    /// A setting did not parse.
    #[error("invalid PODWATCH_{name}='{value}': {reason}")]
    Invalid {
        /// Setting name without the prefix.
        name: &'static str,
        /// Raw value read.
        value: String,
        /// Parser message.
        reason: String,
    },
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(SettingsError::Missing { name })
}

fn parse_url(value: &str, name: &'static str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|err| SettingsError::Invalid {
        name,
        value: value.to_owned(),
        reason: err.to_string(),
    })
}

impl AppSettings {
    /// Database URL, required.
    ///
    /// # Errors
    /// [`SettingsError::Missing`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_deref(), "DATABASE_URL")
    }

    /// Bind address, defaulting to `127.0.0.1:5000`.
    ///
    /// # Errors
    /// [`SettingsError::Invalid`] when the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            name: "BIND_ADDR",
            value: raw.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Catalog client id, required.
    ///
    /// # Errors
    /// [`SettingsError::Missing`] when unset or blank.
    pub fn client_id(&self) -> Result<&str, SettingsError> {
        required(self.client_id.as_deref(), "CLIENT_ID")
    }

    /// Catalog client secret, required; wiped from memory on drop.
    ///
    /// # Errors
    /// [`SettingsError::Missing`] when unset or blank.
    pub fn client_secret(&self) -> Result<Zeroizing<String>, SettingsError> {
        required(self.client_secret.as_deref(), "CLIENT_SECRET")
            .map(|secret| Zeroizing::new(secret.to_owned()))
    }

    /// Redirect URI, defaulting to the local bind address.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uri.as_deref().unwrap_or(DEFAULT_REDIRECT_URI)
    }

    /// Token endpoint.
    ///
    /// # Errors
    /// [`SettingsError::Invalid`] when the value is not a URL.
    pub fn token_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL),
            "TOKEN_URL",
        )
    }

    /// Consent page.
    ///
    /// # Errors
    /// [`SettingsError::Invalid`] when the value is not a URL.
    pub fn authorize_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.authorize_url.as_deref().unwrap_or(DEFAULT_AUTHORIZE_URL),
            "AUTHORIZE_URL",
        )
    }

    /// Catalog API base.
    ///
    /// # Errors
    /// [`SettingsError::Invalid`] when the value is not a URL.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
            "API_BASE_URL",
        )
    }

    /// Outbound request timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Token cache lifetime; zero disables the cache.
    #[must_use]
    pub const fn token_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.token_cache_ttl_secs)
    }
}
