use {
    super::Repository,
    crate::kernel::entities::AuctionId,
};

impl Repository {
    pub async fn remove_in_memory_auction(&self, auction_id: AuctionId) {
        self.in_memory_store
            .auctions
            .write()
            .await
            .remove(&auction_id);
        self.in_memory_store
            .owners
            .write()
            .await
            .remove(&auction_id);
    }
}
