use {
    super::Repository,
    crate::{
        auction::entities,
        kernel::entities::AuctionId,
    },
};

impl Repository {
    pub async fn get_in_memory_auction_lock(
        &self,
        auction_id: AuctionId,
    ) -> Option<entities::AuctionLock> {
        self.in_memory_store
            .auctions
            .read()
            .await
            .get(&auction_id)
            .cloned()
    }
}
