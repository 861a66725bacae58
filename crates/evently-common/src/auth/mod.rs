//! Access token utilities

mod jwt;

pub use jwt::{inspect_access_token, AccessTokenClaims, JwtService};
