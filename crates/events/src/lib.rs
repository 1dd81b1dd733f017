//! Sweetbox event bus and e-mail notification infrastructure.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the canonical domain event envelope.
//! - [`templates`] -- `tera` templates for every transactional e-mail.
//! - [`delivery`] -- outbound mail transport (SMTP via `lettre`).
//! - [`EmailNotifier`] -- background subscriber turning events into e-mails.

pub mod bus;
pub mod delivery;
pub mod notifier;
pub mod payloads;
pub mod templates;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailError, MailTransport, OutgoingEmail, SmtpMailer};
pub use notifier::{EmailNotifier, NotifierSettings};
pub use templates::EmailTemplates;
