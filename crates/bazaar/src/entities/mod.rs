//! Marketplace entity declarations.
//!
//! Each entity is a plain serde struct plus an [`Entity`] impl naming its
//! collection and topic prefix. All persistence behavior comes from
//! [`Repository`](crate::repository::Repository).
//!
//! [`Entity`]: bazaar_core::record::Entity

mod delivery;
mod location;
mod order;
mod review;
mod ride;
mod storefront;
mod support_chat;
mod wallet;
mod webhook;

pub use delivery::{Delivery, DeliveryStatus};
pub use location::Location;
pub use order::{Order, OrderItem, OrderStatus, StatusChanged, STATUS_CHANGED};
pub use review::Review;
pub use ride::{Ride, RideStatus};
pub use storefront::Storefront;
pub use support_chat::{ChatMessage, SupportChat};
pub use wallet::Wallet;
pub use webhook::Webhook;
