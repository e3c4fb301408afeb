//! Demo data for local tooling.

use chrono::Utc;

use bazaar_core::error::Result;

use crate::entities::{
    ChatMessage, Delivery, DeliveryStatus, Location, Order, OrderItem, OrderStatus, Review, Ride,
    RideStatus, Storefront, SupportChat, Wallet, Webhook,
};
use crate::registry::Repositories;

/// Number of records inserted per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub stores: usize,
    pub orders: usize,
    pub deliveries: usize,
    pub rides: usize,
    pub wallets: usize,
    pub reviews: usize,
    pub support_chats: usize,
    pub webhooks: usize,
}

/// Inserts a small connected data set: a store with an order moved to
/// dispatched, its delivery, a ride, wallets, a review, a support chat, and
/// a webhook.
pub async fn seed(repos: &Repositories) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let store = repos
        .stores
        .create(Storefront {
            owner_id: "merchant-1".into(),
            name: "Pastelaria Central".into(),
            description: Some("Custard tarts and coffee".into()),
            address: Location::new(38.7139, -9.1394).with_address("Rua Augusta 100, Lisboa"),
            open: true,
        })
        .await?;
    summary.stores += 1;

    let order = repos
        .orders
        .create(Order {
            customer_id: "customer-1".into(),
            store_id: store.id.to_string(),
            items: vec![
                OrderItem {
                    sku: "pastel-de-nata".into(),
                    quantity: 6,
                    unit_price_minor: 130,
                },
                OrderItem {
                    sku: "galao".into(),
                    quantity: 2,
                    unit_price_minor: 180,
                },
            ],
            status: OrderStatus::Pending,
            currency: "EUR".into(),
        })
        .await?;
    for next in [OrderStatus::Paid, OrderStatus::Preparing, OrderStatus::Dispatched] {
        repos.orders.transition_status(&order.id, next).await?;
    }
    summary.orders += 1;

    repos
        .deliveries
        .create(Delivery {
            order_id: order.id.to_string(),
            courier_id: Some("courier-7".into()),
            pickup: store.data.address.clone(),
            dropoff: Location::new(38.7369, -9.1427).with_address("Avenida da República 50"),
            status: DeliveryStatus::PickedUp,
        })
        .await?;
    summary.deliveries += 1;

    repos
        .rides
        .create(Ride {
            rider_id: "customer-2".into(),
            driver_id: None,
            pickup: Location::new(38.7071, -9.1355),
            dropoff: Location::new(38.7742, -9.1342).with_address("Aeroporto"),
            status: RideStatus::Requested,
            fare_minor: Some(1_450),
        })
        .await?;
    summary.rides += 1;

    for (owner, balance) in [("customer-1", 2_500), ("customer-2", 0)] {
        repos
            .wallets
            .create(Wallet {
                owner_id: owner.into(),
                balance_minor: balance,
                currency: "EUR".into(),
            })
            .await?;
        summary.wallets += 1;
    }

    repos
        .reviews
        .create(Review {
            author_id: "customer-1".into(),
            subject_id: store.id.to_string(),
            rating: 5,
            comment: Some("Still warm on arrival".into()),
        })
        .await?;
    summary.reviews += 1;

    repos
        .support_chats
        .create(SupportChat {
            customer_id: "customer-2".into(),
            agent_id: None,
            subject: "Driver cannot find pickup".into(),
            messages: vec![ChatMessage {
                author_id: "customer-2".into(),
                body: "I'm at the north entrance.".into(),
                sent_at: Utc::now(),
            }],
            open: true,
        })
        .await?;
    summary.support_chats += 1;

    repos
        .webhooks
        .create(Webhook {
            owner_id: "merchant-1".into(),
            url: "https://merchant.example.com/bazaar".into(),
            topics: vec!["order.created".into(), "order.status_changed".into()],
            secret: None,
            active: true,
        })
        .await?;
    summary.webhooks += 1;

    tracing::info!(?summary, "Seeded demo data");
    Ok(summary)
}
