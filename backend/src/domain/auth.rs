//! Authentication primitives: login credentials, registration input and the
//! stored account shape.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use super::password::{PASSWORD_MIN, PasswordDigest, PlainPassword};
use super::user::{EmailAddress, User, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use podwatch::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "s3cret!").unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: PlainPassword,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    /// [`LoginValidationError`] when either value is blank.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: PlainPassword::new(password),
        })
    }

    /// Username string suitable for user lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    #[must_use]
    pub const fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Validation failures for registration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Username or email failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum permitted length.
        min: usize,
    },
}

impl RegistrationValidationError {
    /// Name of the form field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::User(
                UserValidationError::EmptyEmail
                | UserValidationError::EmailTooLong { .. }
                | UserValidationError::InvalidEmail,
            ) => "email",
            Self::User(_) => "username",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    username: Username,
    password: PlainPassword,
    email: EmailAddress,
}

impl Registration {
    /// Validate raw form input.
    ///
    /// # Errors
    /// [`RegistrationValidationError`] naming the first invalid field.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let valid_username = Username::new(username)?;
        let valid_email = EmailAddress::new(email)?;
        let secret = PlainPassword::new(password);
        if secret.char_count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username: valid_username,
            password: secret,
            email: valid_email,
        })
    }

    /// Requested username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Requested password.
    #[must_use]
    pub const fn password(&self) -> &PlainPassword {
        &self.password
    }

    /// Contact email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Insert payload for a new user row; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    /// Unique login name.
    pub username: Username,
    /// Contact email.
    pub email: EmailAddress,
    /// argon2 digest of the chosen password.
    pub password_digest: PasswordDigest,
}

/// Stored user together with its password digest.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Public identity.
    pub user: User,
    /// Stored argon2 digest.
    pub password_digest: PasswordDigest,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  alice  ", " spaced secret ")]
    #[case("bob", "correct horse battery staple")]
    fn valid_credentials_trim_username_only(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password().expose(), password);
    }

    #[rstest]
    #[case("", "secret1", "a@example.com", "username")]
    #[case("alice", "short", "a@example.com", "password")]
    #[case("alice", "secret1", "nope", "email")]
    fn registration_reports_offending_field(
        #[case] username: &str,
        #[case] password: &str,
        #[case] email: &str,
        #[case] field: &str,
    ) {
        let err = Registration::try_from_parts(username, password, email)
            .expect_err("invalid registration");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn registration_accepts_valid_input() {
        let registration = Registration::try_from_parts(" alice ", "secret1", "a@example.com")
            .expect("valid registration");
        assert_eq!(registration.username().as_ref(), "alice");
        assert_eq!(registration.email().as_ref(), "a@example.com");
    }
}
