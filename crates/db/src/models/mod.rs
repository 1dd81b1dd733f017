//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod banner;
pub mod cart;
pub mod category;
pub mod contact;
pub mod donation;
pub mod newsletter;
pub mod order;
pub mod payment;
pub mod product;
pub mod site_notification;
pub mod user;
