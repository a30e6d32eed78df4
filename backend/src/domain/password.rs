//! Password handling: caller-provided secrets and their stored argon2 digests.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to hash password: {message}")]
pub struct PasswordHashingError {
    message: String,
}

/// Plain-text password held only for the duration of a request.
///
/// The buffer is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Wrap a caller-provided password, preserving whitespace.
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self(Zeroizing::new(password.to_owned()))
    }

    /// Password text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the password is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

/// Stored argon2 digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Errors
    /// [`PasswordHashingError`] when argon2 rejects the input.
    pub fn hash(password: &PlainPassword) -> Result<Self, PasswordHashingError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|error| PasswordHashingError {
                message: error.to_string(),
            })
    }

    /// Rehydrate a digest read back from storage.
    #[must_use]
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check `password` against this digest.
    ///
    /// Malformed stored digests never verify.
    #[must_use]
    pub fn verify(&self, password: &PlainPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            tracing::warn!("stored password digest is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }

    /// PHC string for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(***)")
    }
}
