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

pub struct DeleteAuctionInput {
    pub auction_id: AuctionId,
    pub caller:     AccountId,
}

impl Service {
    /// Only the seller or the admin may delete, and only once the auction is finished or the
    /// winner's token expired. The escrow is emptied before the auction is dropped.
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id, caller = %input.caller), err(level = tracing::Level::TRACE))]
    pub async fn delete_auction(&self, input: DeleteAuctionInput) -> Result<(), entities::AuctionError> {
        let owner = self
            .repo
            .get_auction_owner(input.auction_id)
            .await
            .ok_or(entities::AuctionError::AuctionNotFound)?;
        if input.caller != owner && input.caller != self.config.admin {
            return Err(entities::AuctionError::Unauthorized);
        }

        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        auction.ensure_live()?;
        if !auction.is_deletable(self.clock.now()) {
            return Err(entities::AuctionError::NotDeletable);
        }

        let report = self.teardown(&mut auction).await?;
        tracing::debug!(transfers = report.transfers.len(), "Escrow emptied");
        auction.release();
        self.repo.remove_in_memory_auction(auction.id).await;
        self.emit(vec![entities::AuctionEvent::AuctionDeleted {
            auction_id: auction.id,
            by:         input.caller,
        }]);
        Ok(())
    }
}
