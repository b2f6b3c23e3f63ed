use std::fmt;

use chrono::DateTime;
use chrono::Utc;

/// A signed identity token as handed to clients.
///
/// The encoded value is opaque to clients; subject and validity window are
/// kept alongside it for the issuing side only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    subject: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub(crate) fn new(
        value: String,
        subject: String,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            value,
            subject,
            issued_at,
            expires_at,
        }
    }

    /// Encoded bearer value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Consume the token, keeping only the encoded value.
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
