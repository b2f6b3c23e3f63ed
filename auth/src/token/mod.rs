pub mod claims;
pub mod errors;
pub mod issued;
pub mod provider;

pub use claims::Claims;
pub use errors::TokenError;
pub use issued::Token;
pub use provider::TokenProvider;
