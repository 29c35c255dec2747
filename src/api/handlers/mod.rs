//! HTTP request handlers.

pub mod account_handler;
pub mod admin_handler;
pub mod auth_handler;
pub mod booking_handler;
pub mod catalog_handler;
pub mod engagement_handler;
pub mod listing_handler;
pub mod partner_handler;
pub mod payment_handler;

pub use account_handler::account_routes;
pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use booking_handler::booking_routes;
pub use catalog_handler::catalog_routes;
pub use engagement_handler::{notification_routes, wishlist_routes};
pub use listing_handler::listing_routes;
pub use partner_handler::partner_routes;
pub use payment_handler::{payment_callback, payment_routes};
