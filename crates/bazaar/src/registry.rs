//! One repository per declared entity, addressable by collection name.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::entities::{Delivery, Order, Review, Ride, Storefront, SupportChat, Wallet, Webhook};
use crate::persistence::Persistence;
use crate::repository::{CollectionHandle, Repository};

/// Typed repositories for every marketplace entity.
#[derive(Clone)]
pub struct Repositories {
    pub rides: Repository<Ride>,
    pub deliveries: Repository<Delivery>,
    pub stores: Repository<Storefront>,
    pub orders: Repository<Order>,
    pub wallets: Repository<Wallet>,
    pub reviews: Repository<Review>,
    pub support_chats: Repository<SupportChat>,
    pub webhooks: Repository<Webhook>,
    handles: BTreeMap<&'static str, Arc<dyn CollectionHandle>>,
}

impl Repositories {
    pub fn new(persistence: &Persistence) -> Self {
        let rides = persistence.repository::<Ride>();
        let deliveries = persistence.repository::<Delivery>();
        let stores = persistence.repository::<Storefront>();
        let orders = persistence.repository::<Order>();
        let wallets = persistence.repository::<Wallet>();
        let reviews = persistence.repository::<Review>();
        let support_chats = persistence.repository::<SupportChat>();
        let webhooks = persistence.repository::<Webhook>();

        let handles: [Arc<dyn CollectionHandle>; 8] = [
            Arc::new(rides.clone()),
            Arc::new(deliveries.clone()),
            Arc::new(stores.clone()),
            Arc::new(orders.clone()),
            Arc::new(wallets.clone()),
            Arc::new(reviews.clone()),
            Arc::new(support_chats.clone()),
            Arc::new(webhooks.clone()),
        ];
        let handles = handles
            .into_iter()
            .map(|handle| (handle.collection(), handle))
            .collect();

        Self {
            rides,
            deliveries,
            stores,
            orders,
            wallets,
            reviews,
            support_chats,
            webhooks,
            handles,
        }
    }

    /// Looks up a collection by name.
    pub fn collection(&self, name: &str) -> Option<Arc<dyn CollectionHandle>> {
        self.handles.get(name).cloned()
    }

    /// Collection names in ascending order.
    pub fn collections(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handles.keys().copied()
    }
}
