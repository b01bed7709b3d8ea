//! Credential primitives for the events API
//!
//! This crate provides the two pieces of the authentication boundary that do
//! not touch the database:
//!
//! - [`password`]: Argon2id hashing and verification of user passwords
//! - [`token`]: HS256 bearer tokens carrying the authenticated user id
//!
//! Tokens are stateless. Their validity depends only on the signature and the
//! expiry claim at verification time.

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_against_dummy, verify_password};
pub use token::{extract_bearer_token, TokenClaims, TokenIssuer};
