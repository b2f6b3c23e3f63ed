//! Credential primitives library
//!
//! Provides the security-sensitive building blocks of the identity service:
//! - Password hashing (Argon2id, salted, PHC strings)
//! - Signed, time-bound identity tokens (JWT, HS256)
//!
//! Nothing here performs I/O or keeps mutable state; the signing secret and
//! hashing cost are fixed when the values are constructed.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Identity Tokens
//! ```
//! use auth::TokenProvider;
//! use chrono::Duration;
//!
//! let provider = TokenProvider::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let token = provider.issue("alice@example.com").unwrap();
//! let claims = provider.validate(token.as_str()).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Token;
pub use token::TokenError;
pub use token::TokenProvider;
