use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use super::issued::Token;

/// Issues and validates signed, time-bound identity tokens.
///
/// Holds only the signing secret and the validity window, both fixed at
/// construction. Issuing and validating never mutate the provider, so one
/// instance is shared by every request handler. Tokens are signed with HS256.
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    ttl: Duration,
}

impl TokenProvider {
    /// Create a provider for a secret and validity window.
    ///
    /// # Arguments
    /// * `secret` - Signing secret (at least 32 bytes for HS256)
    /// * `ttl` - How long an issued token stays valid
    ///
    /// # Security Notes
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Replacing the secret invalidates every outstanding token
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let algorithm = Algorithm::HS256;

        // Expiry is checked against an explicit clock after the signature.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
            ttl,
        }
    }

    /// Validity window of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid from now.
    ///
    /// # Errors
    /// * `IssueFailed` - Token encoding failed
    pub fn issue(&self, subject: &str) -> Result<Token, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if the current time were `issued_at`.
    ///
    /// # Errors
    /// * `IssueFailed` - Token encoding failed
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<Token, TokenError> {
        let issued_at = issued_at.trunc_subsecs(0);
        let claims = Claims::for_subject(subject, issued_at, self.ttl);

        let value = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::IssueFailed(e.to_string()))?;

        Ok(Token::new(value, claims.sub, issued_at, issued_at + self.ttl))
    }

    /// Validate a token against the current time.
    ///
    /// # Returns
    /// The verified claims
    ///
    /// # Errors
    /// * `SignatureMismatch` - Signature does not match the payload
    /// * `Expired` - Expiration time has passed
    /// * `Malformed` - Token structure, encoding, algorithm or claims are invalid
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// The signature is verified before expiry, so a tampered expired token
    /// reports `SignatureMismatch`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;

        let claims = token_data.claims;
        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn map_decode_error(error: JwtError) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed(error.to_string()),
    }
}
