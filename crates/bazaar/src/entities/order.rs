use std::fmt;

use serde::{Deserialize, Serialize};

use bazaar_core::error::{RepositoryError, Result};
use bazaar_core::record::{Entity, Record, RecordId};

use crate::repository::Repository;

/// Topic verb published alongside `order.updated` when the status moves.
pub const STATUS_CHANGED: &str = "status_changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Preparing,
    Dispatched,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Allowed forward moves. Terminal states accept nothing.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Cancelled)
                | (Paid, Preparing)
                | (Paid, Refunded)
                | (Preparing, Dispatched)
                | (Preparing, Refunded)
                | (Dispatched, Delivered)
                | (Delivered, Refunded)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub sku: String,
    pub quantity: u32,
    pub unit_price_minor: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub customer_id: String,
    pub store_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// ISO 4217 code.
    pub currency: String,
}

impl Order {
    pub fn total_minor(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.unit_price_minor * i64::from(item.quantity))
            .sum()
    }
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    const TOPIC_PREFIX: &'static str = "order";
    const ENTITY_TYPE: &'static str = "Order";
}

/// Payload of `order.status_changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChanged {
    pub id: RecordId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl Repository<Order> {
    /// Moves a live order to `next`, publishing `order.status_changed`.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or deleted orders, `InvalidArgument` when the
    /// move is not allowed from the current status.
    pub async fn transition_status(&self, id: &RecordId, next: OrderStatus) -> Result<Record<Order>> {
        let Some(current) = self.get_by_id(id).await? else {
            return Err(RepositoryError::NotFound {
                entity_type: Order::ENTITY_TYPE,
                id: id.to_string(),
            });
        };

        let from = current.data.status;
        if !from.can_transition_to(next) {
            return Err(RepositoryError::InvalidArgument(format!(
                "order {id} cannot move from {from} to {next}"
            )));
        }

        let mut order = current.data.clone();
        order.status = next;
        let updated = self.update(current.with_data(order)).await?;

        self.emit(
            STATUS_CHANGED,
            &StatusChanged {
                id: *id,
                from,
                to: next,
            },
        );
        tracing::debug!(order_id = %id, %from, to = %next, "Order status changed");
        Ok(updated)
    }
}
