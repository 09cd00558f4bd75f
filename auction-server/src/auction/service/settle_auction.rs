use {
    super::Service,
    crate::{
        auction::entities,
        kernel::{
            entities::{
                AuctionId,
                LedgerAccount,
            },
            ledger::TransferError,
        },
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedPayout {
    pub payout: entities::Payout,
    pub error:  TransferError,
}

/// Outcome of one settlement run. Failed payouts stay owed and are retried by the next run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementReport {
    pub phase:     entities::Phase,
    pub transfers: Vec<entities::Payout>,
    pub failures:  Vec<FailedPayout>,
}

impl SettlementReport {
    fn new(phase: entities::Phase) -> Self {
        Self {
            phase,
            transfers: vec![],
            failures: vec![],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SettleAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    /// Moves a single payout out of the escrow. Returns whether the ledger accepted it.
    async fn pay_out(
        &self,
        auction: &mut entities::Auction,
        payout: entities::Payout,
        report: &mut SettlementReport,
    ) -> bool {
        let result = self
            .ledger
            .transfer(
                &LedgerAccount::Escrow(auction.id),
                &LedgerAccount::Participant(payout.to.clone()),
                payout.amount,
            )
            .await;
        match result {
            Ok(()) => {
                auction.mark_paid(&payout);
                self.emit(vec![entities::AuctionEvent::FundsTransferred {
                    auction_id: auction.id,
                    context:    payout.context,
                    to:         payout.to.clone(),
                    amount:     payout.amount,
                }]);
                report.transfers.push(payout);
                true
            }
            Err(err) => {
                tracing::error!(
                    auction_id = %auction.id,
                    context = %payout.context,
                    to = %payout.to,
                    amount = payout.amount,
                    error = %err,
                    "Settlement transfer failed"
                );
                self.emit(vec![entities::AuctionEvent::TransferFailed {
                    auction_id: auction.id,
                    context:    payout.context,
                    to:         payout.to.clone(),
                    amount:     payout.amount,
                    error:      err.to_string(),
                }]);
                report.failures.push(FailedPayout { payout, error: err });
                false
            }
        }
    }

    /// Refunds every valid bidder that was not refunded yet. A failed refund does not stop the others.
    async fn settle_deposits(
        &self,
        auction: &mut entities::Auction,
        report: &mut SettlementReport,
    ) {
        for payout in auction.pending_refunds() {
            self.pay_out(auction, payout, report).await;
        }
    }

    /// Pays the capped seller amount, then sweeps whatever the escrow holds beyond the refunds
    /// still owed.
    async fn settle_seller(&self, auction: &mut entities::Auction, report: &mut SettlementReport) {
        if let Some(payout) = auction.pending_seller_payment() {
            if !self.pay_out(auction, payout, report).await {
                return;
            }
        }
        let escrow_balance = self
            .ledger
            .balance_of(&LedgerAccount::Escrow(auction.id))
            .await;
        let residual = escrow_balance.saturating_sub(auction.outstanding_refunds());
        if residual > 0 {
            let payout = entities::Payout {
                to:      auction.config.seller.clone(),
                amount:  residual,
                context: entities::TransferContext::ResidualSweep,
            };
            self.pay_out(auction, payout, report).await;
        }
    }

    pub(super) async fn run_settlement(
        &self,
        auction: &mut entities::Auction,
    ) -> SettlementReport {
        let mut report = SettlementReport::new(auction.phase);
        self.settle_deposits(auction, &mut report).await;
        self.settle_seller(auction, &mut report).await;
        tracing::info!(
            transfers = report.transfers.len(),
            failures = report.failures.len(),
            "Settlement finished"
        );
        report
    }

    /// Empties the escrow before the auction is released: outstanding settlement first, then
    /// everything left goes to the seller. Fails on the first transfer the ledger rejects.
    pub(super) async fn teardown(
        &self,
        auction: &mut entities::Auction,
    ) -> Result<SettlementReport, entities::AuctionError> {
        let mut report = match auction.winner {
            Some(_) => self.run_settlement(auction).await,
            None => SettlementReport::new(auction.phase),
        };
        if let Some(failure) = report.failures.first() {
            return Err(entities::AuctionError::TransferFailed(failure.error.clone()));
        }

        let remaining = self
            .ledger
            .balance_of(&LedgerAccount::Escrow(auction.id))
            .await;
        if remaining > 0 {
            let payout = entities::Payout {
                to:      auction.config.seller.clone(),
                amount:  remaining,
                context: entities::TransferContext::Teardown,
            };
            if !self.pay_out(auction, payout, &mut report).await {
                let error = report
                    .failures
                    .last()
                    .map(|failure| failure.error.clone())
                    .unwrap_or_else(|| TransferError::Unavailable("Teardown failed".to_string()));
                return Err(entities::AuctionError::TransferFailed(error));
            }
        }
        Ok(report)
    }

    /// Retries whatever the previous settlement runs left unpaid. Recipients already paid are skipped.
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id), err(level = tracing::Level::TRACE))]
    pub async fn settle_auction(
        &self,
        input: SettleAuctionInput,
    ) -> Result<SettlementReport, entities::AuctionError> {
        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        auction.ensure_settleable()?;
        Ok(self.run_settlement(&mut auction).await)
    }
}
