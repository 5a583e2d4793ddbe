//! Pure rules for the bearer-token auth stub.
//!
//! Tokens are not cryptographically verified. The HTTP layer extracts the
//! bearer token, then asks this module which scope the route needs and
//! whether the token carries it.

mod error;
mod scopes;
mod types;

pub use error::AuthError;
pub use scopes::{
    bearer_token, has_valid_scope, has_valid_scope_from_config, parse_scopes, required_scope,
    MIN_TOKEN_LEN,
};
pub use types::AuthenticatedUser;
