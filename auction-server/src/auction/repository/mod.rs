use {
    crate::{
        auction::entities,
        kernel::entities::{
            AccountId,
            AuctionId,
        },
    },
    std::collections::HashMap,
    tokio::sync::RwLock,
};

mod add_auction;
mod get_auction_owner;
mod get_in_memory_auction_lock;
mod get_in_memory_auctions;
mod remove_in_memory_auction;

/// Live auctions. The map locks are only held to look up a handle, every operation on an
/// auction then serializes on that auction's own lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub auctions: RwLock<HashMap<AuctionId, entities::AuctionLock>>,
    pub owners:   RwLock<HashMap<AuctionId, AccountId>>,
}

#[derive(Debug, Default)]
pub struct Repository {
    pub in_memory_store: InMemoryStore,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }
}
