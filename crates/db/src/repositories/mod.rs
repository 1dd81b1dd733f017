//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any Postgres executor when the call must join
//! a caller-owned transaction) as the first argument.

pub mod banner_repo;
pub mod cart_repo;
pub mod category_repo;
pub mod contact_repo;
pub mod donation_repo;
pub mod newsletter_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod product_repo;
pub mod site_notification_repo;
pub mod user_repo;

pub use banner_repo::BannerRepo;
pub use cart_repo::CartRepo;
pub use category_repo::CategoryRepo;
pub use contact_repo::ContactRepo;
pub use donation_repo::DonationRepo;
pub use newsletter_repo::NewsletterRepo;
pub use order_repo::OrderRepo;
pub use payment_repo::PaymentRepo;
pub use product_repo::ProductRepo;
pub use site_notification_repo::SiteNotificationRepo;
pub use user_repo::UserRepo;

/// Build an `ILIKE` substring pattern from user input, treating `%`, `_`
/// and `\` literally. Pair with `ESCAPE '\'` in the query.
pub(crate) fn contains_pattern(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len() + 2);
    pattern.push('%');
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
