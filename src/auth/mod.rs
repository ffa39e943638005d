//! Password hashing and token issuance
//!
//! - [`password`] - Argon2 hash/verify
//! - [`token`] - HS256 access and refresh tokens

pub mod password;
pub mod token;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token creation failed: {0}")]
    TokenCreation(String),
}

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
