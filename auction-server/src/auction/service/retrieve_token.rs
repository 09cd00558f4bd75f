use {
    super::Service,
    crate::{
        auction::entities,
        kernel::entities::{
            AccountId,
            AuctionId,
        },
    },
};

pub struct RetrieveTokenInput {
    pub auction_id: AuctionId,
    pub caller:     AccountId,
}

impl Service {
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id, caller = %input.caller), err(level = tracing::Level::TRACE))]
    pub async fn retrieve_token(
        &self,
        input: RetrieveTokenInput,
    ) -> Result<entities::Token, entities::AuctionError> {
        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        let token = auction.retrieve_token(&input.caller, self.clock.now())?;
        self.emit(vec![entities::AuctionEvent::TokenRetrieved {
            auction_id: auction.id,
            by:         input.caller,
        }]);
        Ok(token)
    }
}
