pub mod token;

pub use token::{IssuedToken, OAuthStateClaims, TokenClaims, TokenPurpose};
