//! Authentication primitives.
//!
//! - [`identity`] -- identity-provider (Firebase) ID-token verification.
//! - [`jwt`] -- local access-token generation and validation.

pub mod identity;
pub mod jwt;
