//! User identity model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The id was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was blank after trimming.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeded [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The username contained characters outside the allowed set.
    #[error("username may only contain letters, numbers, '_', '-' or '.'")]
    UsernameInvalidCharacters,
    /// The email was blank after trimming.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email exceeded [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The email did not look like an address.
    #[error("email must look like name@example.com")]
    InvalidEmail,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    /// [`UserValidationError`] describing the first rule the input breaks.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID, e.g. one read back from the database.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 30;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_.-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique login name.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`USERNAME_MAX`] characters.
/// - Letters, digits, `_`, `-` and `.` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Errors
    /// [`UserValidationError`] describing the first rule the input breaks.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(trimmed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Errors
    /// [`UserValidationError`] describing the first rule the input breaks.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered application user.
///
/// The password hash never leaves the persistence boundary inside this type;
/// see [`crate::domain::UserAccount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    admin: bool,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub const fn new(id: UserId, username: Username, email: EmailAddress, admin: bool) -> Self {
        Self {
            id,
            username,
            email,
            admin,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Whether the user may manage the podcast library.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.admin
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for user value validation.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn rejects_invalid_user_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn user_id_round_trips_through_uuid() {
        let id = UserId::random();
        let same = UserId::from_uuid(*id.as_uuid());
        assert_eq!(id, same);
        assert_eq!(same.to_string(), id.as_uuid().to_string());
    }

    #[rstest]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("has space", UserValidationError::UsernameInvalidCharacters)]
    #[case("emoji🎧", UserValidationError::UsernameInvalidCharacters)]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
    }

    #[rstest]
    fn rejects_overlong_usernames() {
        let raw = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(raw).expect_err("too long"),
            UserValidationError::UsernameTooLong { max: USERNAME_MAX }
        );
    }

    #[rstest]
    #[case("  alice  ", "alice")]
    #[case("pod.fan-99_x", "pod.fan-99_x")]
    fn accepts_and_trims_usernames(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Username::new(raw).expect("valid username").as_ref(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("alice", UserValidationError::InvalidEmail)]
    #[case("alice@localhost", UserValidationError::InvalidEmail)]
    #[case("a b@example.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw).expect_err("invalid email"), expected);
    }

    #[rstest]
    fn accepts_plain_email() {
        let email = EmailAddress::new(" alice@example.com ").expect("valid email");
        assert_eq!(email.as_ref(), "alice@example.com");
    }
}
