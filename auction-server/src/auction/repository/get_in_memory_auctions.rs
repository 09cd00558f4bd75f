use {
    super::Repository,
    crate::{
        auction::entities,
        kernel::entities::AuctionId,
    },
};

impl Repository {
    pub async fn get_in_memory_auction_locks(&self) -> Vec<(AuctionId, entities::AuctionLock)> {
        self.in_memory_store
            .auctions
            .read()
            .await
            .iter()
            .map(|(auction_id, lock)| (*auction_id, lock.clone()))
            .collect()
    }
}
