use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Identity token payload.
///
/// Standard RFC 7519 claims only. Every field is required; a token missing
/// any of them is rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (normalized email of the account)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, random per token
    pub jti: String,
}

impl Claims {
    /// Build claims for a subject issued at `issued_at`, expiring after `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Identity the token is bound to
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Validity window
    pub fn for_subject(subject: impl ToString, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let expiration = issued_at + ttl;

        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its expiration second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let now = Utc::now();
        let claims = Claims::for_subject("a@x.com", now, Duration::hours(24));

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_jti_is_unique_per_token() {
        let now = Utc::now();
        let first = Claims::for_subject("a@x.com", now, Duration::hours(1));
        let second = Claims::for_subject("a@x.com", now, Duration::hours(1));

        assert_ne!(first, second);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "a@x.com".to_string(),
            iat: 0,
            exp: 1000,
            jti: "id".to_string(),
        };

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_wire_format() {
        let claims = Claims {
            sub: "a@x.com".to_string(),
            iat: 10,
            exp: 20,
            jti: "id".to_string(),
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "sub": "a@x.com", "iat": 10, "exp": 20, "jti": "id" })
        );
    }
}
