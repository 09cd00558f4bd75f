use {
    super::{
        settle_auction::SettlementReport,
        Service,
    },
    crate::{
        auction::entities,
        kernel::entities::AuctionId,
    },
};

pub struct CloseOpenRoundInput {
    pub auction_id: AuctionId,
}

impl Service {
    /// Closes the reveal round. With at least one valid reveal the winner is picked and the
    /// escrow settled before returning.
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id, winner), err(level = tracing::Level::TRACE))]
    pub async fn close_open_round(
        &self,
        input: CloseOpenRoundInput,
    ) -> Result<SettlementReport, entities::AuctionError> {
        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        let now = self.clock.now();

        let mut next = auction.clone();
        let phase = next.close_open_round(now)?;
        let winner = match phase {
            entities::Phase::Closed => Some(next.find_winner(now)?),
            entities::Phase::ReadyForDeletion => None,
            entities::Phase::HiddenBidding | entities::Phase::OpenBidding => {
                return Err(entities::AuctionError::InvalidState {
                    operation: "close the open round",
                    phase,
                })
            }
        };
        *auction = next;

        let Some(winner) = winner else {
            tracing::info!("No valid reveals, deposits are forfeited");
            self.emit(vec![entities::AuctionEvent::ClosedWithNoBids {
                auction_id: auction.id,
                round:      entities::Round::Open,
            }]);
            return Ok(SettlementReport {
                phase,
                transfers: vec![],
                failures: vec![],
            });
        };

        tracing::Span::current().record("winner", winner.account.as_str());
        self.emit(vec![
            entities::AuctionEvent::RoundClosed {
                auction_id: auction.id,
                round:      entities::Round::Open,
                new_phase:  phase,
            },
            entities::AuctionEvent::WinnerFound {
                auction_id: auction.id,
                winner:     winner.account,
                bid:        winner.bid,
            },
        ]);
        Ok(self.run_settlement(&mut auction).await)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::service::{
            close_hidden_round::CloseHiddenRoundInput,
            get_auction::GetAuctionInput,
            tests::{
                TestContext,
                DEPOSIT,
                INITIAL_BALANCE,
            },
        },
        time::Duration,
    };

    #[tokio::test]
    async fn test_close_open_round_deadline_is_strict() {
        let context = TestContext::new(&["alice"]);
        let auction_id = context.create_auction().await;
        context.hidden_bid(auction_id, "alice", 60_000).await.unwrap();
        context.pass_hidden_deadline();
        context
            .service
            .close_hidden_round(CloseHiddenRoundInput { auction_id })
            .await
            .unwrap();
        context.reveal(auction_id, "alice", 60_000).await.unwrap();

        let auction = context
            .service
            .get_auction(GetAuctionInput { auction_id })
            .await
            .unwrap();
        let deadline = auction.config.open_deadline;
        context.clock.set(deadline);
        assert_eq!(
            context
                .service
                .close_open_round(CloseOpenRoundInput { auction_id })
                .await,
            Err(entities::AuctionError::DeadlineNotYetReached { deadline })
        );

        context.clock.set(deadline + Duration::seconds(1));
        let report = context
            .service
            .close_open_round(CloseOpenRoundInput { auction_id })
            .await
            .unwrap();
        assert_eq!(report.phase, entities::Phase::Closed);
        assert!(matches!(
            context
                .service
                .close_open_round(CloseOpenRoundInput { auction_id })
                .await,
            Err(entities::AuctionError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_valid_reveal_forfeits_deposits() {
        let mut context = TestContext::new(&["alice", "bob"]);
        let auction_id = context.create_auction().await;
        context.hidden_bid(auction_id, "alice", 60_000).await.unwrap();
        context.hidden_bid(auction_id, "bob", 70_000).await.unwrap();
        context.pass_hidden_deadline();
        context
            .service
            .close_hidden_round(CloseHiddenRoundInput { auction_id })
            .await
            .unwrap();
        assert_eq!(
            context.reveal(auction_id, "bob", 1).await,
            Err(entities::AuctionError::CommitmentMismatch)
        );
        context.drain_events();

        context.pass_open_deadline();
        let report = context
            .service
            .close_open_round(CloseOpenRoundInput { auction_id })
            .await
            .unwrap();
        assert_eq!(report.phase, entities::Phase::ReadyForDeletion);
        assert!(report.transfers.is_empty());
        assert_eq!(
            context.drain_events(),
            vec![entities::AuctionEvent::ClosedWithNoBids {
                auction_id,
                round: entities::Round::Open,
            }]
        );
        assert_eq!(context.escrow_balance(auction_id).await, 2 * DEPOSIT);
        assert_eq!(context.balance("alice").await, INITIAL_BALANCE - DEPOSIT);

        let auction = context
            .service
            .get_auction(GetAuctionInput { auction_id })
            .await
            .unwrap();
        assert!(auction.winner.is_none());
        assert!(auction.token.is_none());
    }

    #[tokio::test]
    async fn test_tie_goes_to_first_registered_bidder() {
        let context = TestContext::new(&["alice", "bob"]);
        let auction_id = context.create_auction().await;
        context.hidden_bid(auction_id, "bob", 75_000).await.unwrap();
        context.hidden_bid(auction_id, "alice", 75_000).await.unwrap();
        context.pass_hidden_deadline();
        context
            .service
            .close_hidden_round(CloseHiddenRoundInput { auction_id })
            .await
            .unwrap();
        context.reveal(auction_id, "alice", 75_000).await.unwrap();
        context.reveal(auction_id, "bob", 75_000).await.unwrap();

        context.pass_open_deadline();
        context
            .service
            .close_open_round(CloseOpenRoundInput { auction_id })
            .await
            .unwrap();
        let auction = context
            .service
            .get_auction(GetAuctionInput { auction_id })
            .await
            .unwrap();
        assert_eq!(
            auction.winner.map(|winner| winner.account),
            Some("bob".to_string())
        );
        assert_eq!(context.balance("alice").await, INITIAL_BALANCE);
        assert_eq!(context.balance("bob").await, INITIAL_BALANCE - 75_000);
    }
}
