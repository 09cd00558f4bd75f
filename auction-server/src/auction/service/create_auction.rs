use {
    super::Service,
    crate::auction::entities,
    std::sync::Arc,
    tokio::sync::Mutex,
    uuid::Uuid,
};

pub struct CreateAuctionInput {
    pub params: entities::AuctionParams,
}

impl Service {
    #[tracing::instrument(skip_all, fields(seller = %input.params.seller, auction_id), err(level = tracing::Level::TRACE))]
    pub async fn create_auction(
        &self,
        input: CreateAuctionInput,
    ) -> Result<entities::Auction, entities::AuctionError> {
        let auction = entities::Auction::try_new(
            Uuid::new_v4(),
            input.params,
            &self.config.timing,
            self.clock.now(),
        )?;
        tracing::Span::current().record("auction_id", tracing::field::display(auction.id));

        let lock = Arc::new(Mutex::new(auction));
        let auction = lock.lock().await;
        self.repo
            .add_auction(auction.id, auction.config.seller.clone(), lock.clone())
            .await;
        self.emit(vec![entities::AuctionEvent::AuctionCreated {
            auction_id:  auction.id,
            seller:      auction.config.seller.clone(),
            good_amount: auction.config.good_amount,
            min_bid:     auction.config.min_bid,
            deposit:     auction.config.deposit,
        }]);
        Ok(auction.clone())
    }
}
