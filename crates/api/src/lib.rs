//! Sweetbox API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! gateway clients, background jobs) so integration tests and the binary
//! entrypoint share the same wiring.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod gateways;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
