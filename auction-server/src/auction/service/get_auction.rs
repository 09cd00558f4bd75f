use {
    super::Service,
    crate::{
        auction::entities,
        kernel::entities::AuctionId,
    },
    time::OffsetDateTime,
};

pub struct GetAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    pub async fn get_auction(
        &self,
        input: GetAuctionInput,
    ) -> Result<entities::Auction, entities::AuctionError> {
        let lock = self.get_auction_lock(input.auction_id).await?;
        let auction = lock.lock().await;
        auction.ensure_live()?;
        Ok(auction.clone())
    }

    pub async fn get_current_state(
        &self,
        input: GetAuctionInput,
    ) -> Result<entities::Phase, entities::AuctionError> {
        Ok(self.get_auction(input).await?.phase)
    }

    /// Expiry of the winner's token, absent until a winner was found.
    pub async fn get_token_valid_until(
        &self,
        input: GetAuctionInput,
    ) -> Result<Option<OffsetDateTime>, entities::AuctionError> {
        Ok(self.get_auction(input).await?.token_valid_until())
    }
}
