//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

/// All roles a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CUSTOMER];
