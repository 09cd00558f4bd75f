use {
    super::Repository,
    crate::{
        auction::entities,
        kernel::entities::{
            AccountId,
            AuctionId,
        },
    },
};

impl Repository {
    // NOTE: Do not call this function directly. Instead call `create_auction` from `Service`.
    pub async fn add_auction(
        &self,
        auction_id: AuctionId,
        seller: AccountId,
        auction: entities::AuctionLock,
    ) {
        self.in_memory_store
            .auctions
            .write()
            .await
            .insert(auction_id, auction);
        self.in_memory_store
            .owners
            .write()
            .await
            .insert(auction_id, seller);
    }
}
