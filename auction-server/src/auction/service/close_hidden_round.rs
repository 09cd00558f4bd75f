use {
    super::Service,
    crate::{
        auction::entities,
        kernel::entities::AuctionId,
    },
};

pub struct CloseHiddenRoundInput {
    pub auction_id: AuctionId,
}

impl Service {
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id), err(level = tracing::Level::TRACE))]
    pub async fn close_hidden_round(
        &self,
        input: CloseHiddenRoundInput,
    ) -> Result<entities::Phase, entities::AuctionError> {
        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        let phase = auction.close_hidden_round(self.clock.now())?;
        let event = match phase {
            entities::Phase::ReadyForDeletion => entities::AuctionEvent::ClosedWithNoBids {
                auction_id: auction.id,
                round:      entities::Round::Hidden,
            },
            entities::Phase::HiddenBidding
            | entities::Phase::OpenBidding
            | entities::Phase::Closed => entities::AuctionEvent::RoundClosed {
                auction_id: auction.id,
                round:      entities::Round::Hidden,
                new_phase:  phase,
            },
        };
        tracing::info!(bidders = auction.bids.len(), new_phase = %phase, "Hidden round closed");
        self.emit(vec![event]);
        Ok(phase)
    }
}
