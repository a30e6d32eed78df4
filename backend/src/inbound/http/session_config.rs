//! Cookie session settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning; release
//! builds refuse to start on missing or invalid toggles.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

/// Path of the session signing key file.
pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
/// Whether cookies carry the `Secure` attribute.
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// `SameSite` policy for the session cookie.
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
/// Permit a generated key when the key file is unusable.
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/podwatch_session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether session toggles may fall back to defaults.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed toggles fall back with a warning.
    Debug,
    /// Missing or malformed toggles stop startup.
    Release,
}

impl BuildMode {
    /// Mode of the running binary.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn lenient(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Signing and encryption key for the cookie store.
    pub key: Key,
    /// Send the cookie over HTTPS only.
    pub cookie_secure: bool,
    /// `SameSite` attribute of the cookie.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short hex fingerprint of the signing key, safe to log.
    ///
    /// # Examples
    /// ```
    /// use actix_web::cookie::{Key, SameSite};
    /// use podwatch::inbound::http::session_config::SessionSettings;
    ///
    /// let settings = SessionSettings {
    ///     key: Key::derive_from(&[7; 64]),
    ///     cookie_secure: true,
    ///     same_site: SameSite::Lax,
    /// };
    /// assert_eq!(settings.key_fingerprint().len(), 16);
    /// ```
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.signing());
        let prefix: Vec<u8> = digest.iter().take(FINGERPRINT_BYTES).copied().collect();
        hex::encode(prefix)
    }
}

/// Reasons the session settings were refused.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A release build found no value for a toggle.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A release build found a value it could not parse.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value read.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file held fewer bytes than a cookie key needs.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` was requested without secure cookies.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys were requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate every session toggle.
///
/// # Errors
/// Release builds fail on any missing or malformed toggle, on an unreadable
/// or short key file, and on `SameSite=None` without secure cookies.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.lenient() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        if mode.lenient() {
            warn!(name, default, "session toggle not set; using default");
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.lenient() => {
            warn!(name, %value, default, "invalid session toggle; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.lenient() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.lenient() {
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.lenient() => {
            warn!("SESSION_SAMESITE=None without secure cookies; browsers may drop them");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.lenient() => {
            warn!(%value, "invalid SESSION_SAMESITE; using default");
            Ok(default)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(error) if mode.lenient() || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };
    let length = bytes.len();
    if length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        if mode.lenient() {
            warn!(path = %path.display(), length, "session key too short; using temporary key");
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
