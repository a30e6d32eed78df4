//! Values exchanged with the external podcast catalog.
//!
//! The catalog is reached with a short-lived bearer token obtained from an
//! authorization code. Neither secret is ever logged raw: codes are identified
//! by their SHA-256 fingerprint and tokens redact themselves in `Debug`.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::podcast::ShowId;

/// Number of episodes requested per catalog page.
pub const EPISODE_PAGE_SIZE: u32 = 50;

/// Validation errors for catalog request values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    /// The provider redirect carried a blank code.
    #[error("authorization code must not be empty")]
    EmptyAuthorizationCode,
    /// The search term was empty.
    #[error("keyword must not be empty")]
    EmptyKeyword,
    /// The offset was not a whole number.
    #[error("offset must be a non-negative integer")]
    InvalidOffset,
}

/// Authorization code returned by the provider's consent redirect.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    /// Wrap a code taken from the consent redirect.
    ///
    /// # Errors
    /// [`CatalogValidationError::EmptyAuthorizationCode`] when blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, CatalogValidationError> {
        let code: String = raw.into();
        if code.trim().is_empty() {
            return Err(CatalogValidationError::EmptyAuthorizationCode);
        }
        Ok(Self(code))
    }

    /// Raw code, sent only to the token endpoint.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hex SHA-256 of the code, safe for logs and cache keys.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthorizationCode")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Bearer token for authenticated catalog calls.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap a token returned by the token endpoint.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Token text for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Show details returned by a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRecord {
    /// Show title.
    pub name: String,
    /// Show description.
    pub description: String,
    /// Publisher name.
    pub publisher: String,
    /// First cover image, if the catalog lists any.
    pub image_url: Option<String>,
    /// Catalog identifier.
    pub id: ShowId,
}

/// One episode from a catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeSummary {
    /// Episode title.
    pub name: String,
    /// Episode description searched by keyword.
    pub description: String,
}

/// Zero-based index of the first episode to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EpisodeOffset(u32);

impl EpisodeOffset {
    /// Wrap a raw offset.
    #[must_use]
    pub const fn new(offset: u32) -> Self {
        Self(offset)
    }

    /// Parse an optional form value; blank means zero.
    ///
    /// # Errors
    /// [`CatalogValidationError::InvalidOffset`] when the value is not a
    /// non-negative integer.
    pub fn parse(raw: Option<&str>) -> Result<Self, CatalogValidationError> {
        raw.map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(
                || Ok(Self::default()),
                |value| {
                    value
                        .parse::<u32>()
                        .map(Self)
                        .map_err(|_| CatalogValidationError::InvalidOffset)
                },
            )
    }

    /// Raw offset.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EpisodeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Literal search term matched against episode descriptions.
///
/// Not trimmed: the term is matched exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    /// Wrap a search term.
    ///
    /// # Errors
    /// [`CatalogValidationError::EmptyKeyword`] when empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, CatalogValidationError> {
        let term: String = raw.into();
        if term.is_empty() {
            return Err(CatalogValidationError::EmptyKeyword);
        }
        Ok(Self(term))
    }

    /// Search term as typed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_stable_hex() {
        let code = AuthorizationCode::new("abc").expect("code");
        assert_eq!(
            code.fingerprint(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(!format!("{code:?}").contains("\"abc\""));
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some(""), 0)]
    #[case(Some(" 50 "), 50)]
    fn parses_offsets(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(EpisodeOffset::parse(raw).expect("offset").get(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("ten")]
    fn rejects_bad_offsets(#[case] raw: &str) {
        assert_eq!(
            EpisodeOffset::parse(Some(raw)).expect_err("invalid offset"),
            CatalogValidationError::InvalidOffset
        );
    }

    #[rstest]
    fn keyword_keeps_whitespace() {
        assert_eq!(Keyword::new(" cat").expect("keyword").as_str(), " cat");
        assert!(Keyword::new("").is_err());
    }

    #[rstest]
    fn bearer_token_debug_is_redacted() {
        let token = BearerToken::new("secret-token");
        assert_eq!(format!("{token:?}"), "BearerToken(***)");
    }
}
