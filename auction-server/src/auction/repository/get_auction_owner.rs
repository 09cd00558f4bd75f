use {
    super::Repository,
    crate::kernel::entities::{
        AccountId,
        AuctionId,
    },
};

impl Repository {
    pub async fn get_auction_owner(&self, auction_id: AuctionId) -> Option<AccountId> {
        self.in_memory_store
            .owners
            .read()
            .await
            .get(&auction_id)
            .cloned()
    }
}
