use {
    super::Service,
    crate::{
        auction::entities,
        kernel::entities::{
            AccountId,
            Amount,
            AuctionId,
        },
    },
};

pub struct RevealBidInput {
    pub auction_id: AuctionId,
    pub bidder:     AccountId,
    pub value:      Amount,
    pub salt:       Vec<u8>,
}

impl Service {
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id, bidder = %input.bidder), err(level = tracing::Level::TRACE))]
    pub async fn reveal_bid(&self, input: RevealBidInput) -> Result<(), entities::AuctionError> {
        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        auction.reveal_bid(&input.bidder, input.value, &input.salt, self.clock.now())?;
        self.emit(vec![entities::AuctionEvent::OpenBidReceived {
            auction_id: auction.id,
            bidder:     input.bidder,
            value:      input.value,
        }]);
        Ok(())
    }
}
