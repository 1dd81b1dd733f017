//! Domain rules for the Sweetbox ordering platform.
//!
//! This crate has no internal dependencies so it can be shared by the
//! database layer, the HTTP API, and the event/email services.

pub mod banner;
pub mod cache;
pub mod cart;
pub mod category;
pub mod contact;
pub mod dispatch;
pub mod donation;
pub mod error;
pub mod newsletter;
pub mod order;
pub mod pagination;
pub mod payment;
pub mod product;
pub mod queue;
pub mod retry;
pub mod roles;
pub mod shop_hours;
pub mod site_notification;
pub mod sitemap;
pub mod types;
pub mod validation;
