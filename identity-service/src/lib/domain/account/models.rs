use std::fmt;
use std::str::FromStr;

use auth::Token;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::InputError;

/// Public identity of a registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub role: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored login credential. The hash is a PHC string, never the plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: EmailAddress,
    pub password_hash: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// The record a user directory stores: identity plus credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub identity: UserIdentity,
    pub credential: Credential,
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub identity: UserIdentity,
    pub token: Token,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidUserId` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, InputError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| InputError::InvalidUserId(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed, validated with an RFC 5322 parser, and lower-cased, so two
/// addresses differing only in case are the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new normalized email address.
    ///
    /// # Errors
    /// * `BlankEmail` - Empty or whitespace only
    /// * `InvalidEmail` - Not a valid address
    pub fn new(email: impl AsRef<str>) -> Result<Self, InputError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(InputError::BlankEmail);
        }

        email_address::EmailAddress::from_str(email)
            .map(|_| EmailAddress(email.to_lowercase()))
            .map_err(|e| InputError::InvalidEmail(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as submitted by a client.
///
/// Only checked for blankness; never printed.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `BlankPassword` - Empty or whitespace only
    pub fn new(password: String) -> Result<Self, InputError> {
        if password.trim().is_empty() {
            return Err(InputError::BlankPassword);
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Display name value type
///
/// Trimmed, 1 to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 64;

    /// # Errors
    /// * `BlankDisplayName` - Empty or whitespace only
    /// * `DisplayNameTooLong` - Longer than 64 characters
    pub fn new(name: impl AsRef<str>) -> Result<Self, InputError> {
        let name = name.as_ref().trim();
        let length = name.chars().count();

        if length == 0 {
            Err(InputError::BlankDisplayName)
        } else if length > Self::MAX_LENGTH {
            Err(InputError::DisplayNameTooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Profile fields supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub display_name: DisplayName,
    /// Client-supplied label. Informational only: never use it for access
    /// checks.
    pub role: String,
    pub avatar: Option<String>,
}

impl Profile {
    pub const DEFAULT_ROLE: &'static str = "user";
}

/// Raw registration input, validated by the credential service.
#[derive(Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Option<String>,
    pub avatar: Option<String>,
}

impl RegistrationRequest {
    /// Validate every field.
    ///
    /// # Errors
    /// * `InputError` - First invalid field encountered
    pub fn validate(self) -> Result<(EmailAddress, Password, Profile), InputError> {
        let email = EmailAddress::new(&self.email)?;
        let password = Password::new(self.password)?;
        let display_name = DisplayName::new(&self.display_name)?;

        // Taken as given; nothing here grants privileges.
        let role = self
            .role
            .map(|role| role.trim().to_string())
            .filter(|role| !role.is_empty())
            .unwrap_or_else(|| Profile::DEFAULT_ROLE.to_string());
        let avatar = self
            .avatar
            .map(|avatar| avatar.trim().to_string())
            .filter(|avatar| !avatar.is_empty());

        Ok((
            email,
            password,
            Profile {
                display_name,
                role,
                avatar,
            },
        ))
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("avatar", &self.avatar)
            .finish_non_exhaustive()
    }
}

/// Raw login input, validated by the credential service.
#[derive(Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// # Errors
    /// * `InputError` - Blank or malformed email, blank password
    pub fn validate(self) -> Result<(EmailAddress, Password), InputError> {
        let email = EmailAddress::new(&self.email)?;
        let password = Password::new(self.password)?;
        Ok((email, password))
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
