use {
    super::Service,
    crate::{
        auction::entities,
        kernel::{
            commitment::Commitment,
            entities::{
                AccountId,
                Amount,
                AuctionId,
                LedgerAccount,
            },
        },
    },
};

pub struct SubmitHiddenBidInput {
    pub auction_id: AuctionId,
    pub bidder:     AccountId,
    pub commitment: Commitment,
    pub deposit:    Amount,
}

impl Service {
    /// Seals a bid and moves the deposit into the auction escrow. Nothing changes if the
    /// escrow transfer fails.
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id, bidder = %input.bidder), err(level = tracing::Level::TRACE))]
    pub async fn submit_hidden_bid(
        &self,
        input: SubmitHiddenBidInput,
    ) -> Result<(), entities::AuctionError> {
        if input.bidder.is_empty() {
            return Err(entities::AuctionError::InvalidParameters(
                "Bidder must not be empty".to_string(),
            ));
        }
        let lock = self.get_auction_lock(input.auction_id).await?;
        let mut auction = lock.lock().await;
        auction.check_hidden_bid(input.deposit, self.clock.now())?;

        self.ledger
            .transfer(
                &LedgerAccount::Participant(input.bidder.clone()),
                &LedgerAccount::Escrow(auction.id),
                input.deposit,
            )
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "Failed to escrow hidden bid deposit");
                entities::AuctionError::TransferFailed(err)
            })?;

        let is_new = auction.record_hidden_bid(input.bidder.clone(), input.commitment, input.deposit);
        tracing::debug!(is_new, "Hidden bid recorded");
        self.emit(vec![entities::AuctionEvent::HiddenBidReceived {
            auction_id: auction.id,
            bidder:     input.bidder,
            deposit:    input.deposit,
        }]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::service::{
                get_auction::GetAuctionInput,
                tests::{
                    participant,
                    TestContext,
                    DEPOSIT,
                    INITIAL_BALANCE,
                },
            },
            kernel::{
                clock::tests::ManualClock,
                commitment,
                ledger::{
                    MockLedger,
                    TransferError,
                },
                test_utils::genesis_time,
            },
        },
        std::sync::Arc,
        time::Duration,
    };

    #[tokio::test]
    async fn test_submit_hidden_bid_escrows_deposit() {
        let mut context = TestContext::new(&["alice"]);
        let auction_id = context.create_auction().await;
        context.drain_events();

        context.hidden_bid(auction_id, "alice", 60_000).await.unwrap();

        assert_eq!(context.balance("alice").await, INITIAL_BALANCE - DEPOSIT);
        assert_eq!(context.escrow_balance(auction_id).await, DEPOSIT);
        let auction = context
            .service
            .get_auction(GetAuctionInput { auction_id })
            .await
            .unwrap();
        let bid = auction.bids.get(&"alice".to_string()).unwrap();
        assert_eq!(bid.deposit_held, DEPOSIT);
        assert!(!bid.is_reveal_valid());
        assert_eq!(
            context.drain_events(),
            vec![entities::AuctionEvent::HiddenBidReceived {
                auction_id,
                bidder: "alice".to_string(),
                deposit: DEPOSIT,
            }]
        );
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_commitment() {
        let context = TestContext::new(&["alice", "bob"]);
        let auction_id = context.create_auction().await;
        context.hidden_bid(auction_id, "alice", 60_000).await.unwrap();
        context.hidden_bid(auction_id, "bob", 70_000).await.unwrap();
        context.hidden_bid(auction_id, "alice", 80_000).await.unwrap();

        let auction = context
            .service
            .get_auction(GetAuctionInput { auction_id })
            .await
            .unwrap();
        let bidders: Vec<_> = auction.bids.iter().map(|(bidder, _)| bidder.clone()).collect();
        assert_eq!(bidders, vec!["alice".to_string(), "bob".to_string()]);
        let alice = auction.bids.get(&"alice".to_string()).unwrap();
        assert_eq!(
            alice.commitment,
            commitment::commit(80_000, &crate::auction::service::tests::salt("alice"))
        );
        assert_eq!(alice.deposit_held, 2 * DEPOSIT);
        assert_eq!(context.escrow_balance(auction_id).await, 3 * DEPOSIT);
    }

    #[tokio::test]
    async fn test_submit_hidden_bid_deadline_is_strict() {
        let context = TestContext::new(&["alice", "bob"]);
        let auction_id = context.create_auction().await;
        let deadline = genesis_time() + Duration::days(1);

        context.clock.set(deadline - Duration::seconds(1));
        context.hidden_bid(auction_id, "alice", 60_000).await.unwrap();

        context.clock.set(deadline);
        assert_eq!(
            context.hidden_bid(auction_id, "bob", 60_000).await,
            Err(entities::AuctionError::DeadlinePassed { deadline })
        );
        assert_eq!(context.balance("bob").await, INITIAL_BALANCE);
    }

    #[tokio::test]
    async fn test_insufficient_deposit_moves_nothing() {
        let context = TestContext::new(&["alice"]);
        let auction_id = context.create_auction().await;
        let result = context
            .service
            .submit_hidden_bid(SubmitHiddenBidInput {
                auction_id,
                bidder: "alice".to_string(),
                commitment: commitment::commit(60_000, b"salt"),
                deposit: DEPOSIT - 1,
            })
            .await;
        assert_eq!(
            result,
            Err(entities::AuctionError::InsufficientDeposit {
                required: DEPOSIT,
                sent:     DEPOSIT - 1,
            })
        );
        assert_eq!(context.balance("alice").await, INITIAL_BALANCE);
        assert_eq!(context.escrow_balance(auction_id).await, 0);
    }

    #[tokio::test]
    async fn test_unfunded_bidder_is_rejected() {
        let context = TestContext::new(&[]);
        let auction_id = context.create_auction().await;
        let result = context.hidden_bid(auction_id, "mallory", 60_000).await;
        assert!(matches!(
            result,
            Err(entities::AuctionError::TransferFailed(
                TransferError::InsufficientFunds { .. }
            ))
        ));
        let auction = context
            .service
            .get_auction(GetAuctionInput { auction_id })
            .await
            .unwrap();
        assert!(auction.bids.is_empty());
    }

    #[tokio::test]
    async fn test_failed_escrow_transfer_leaves_no_bid() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_transfer()
            .withf(|from, _, amount| *from == participant("alice") && *amount == DEPOSIT)
            .times(1)
            .returning(|_, _, _| Err(TransferError::Unavailable("ledger offline".to_string())));
        let clock = Arc::new(ManualClock::new(genesis_time()));
        let (service, mut events) = Service::new_with_ledger(Arc::new(ledger), clock);

        let auction = service
            .create_auction(crate::auction::service::create_auction::CreateAuctionInput {
                params: entities::AuctionParams {
                    seller:      "seller".to_string(),
                    good_amount: 1,
                    min_bid:     1,
                    deposit:     DEPOSIT,
                },
            })
            .await
            .unwrap();
        let result = service
            .submit_hidden_bid(SubmitHiddenBidInput {
                auction_id: auction.id,
                bidder:     "alice".to_string(),
                commitment: commitment::commit(10, b"salt"),
                deposit:    DEPOSIT,
            })
            .await;
        assert_eq!(
            result,
            Err(entities::AuctionError::TransferFailed(
                TransferError::Unavailable("ledger offline".to_string())
            ))
        );

        let auction = service
            .get_auction(GetAuctionInput {
                auction_id: auction.id,
            })
            .await
            .unwrap();
        assert!(auction.bids.is_empty());
        assert!(matches!(
            events.try_recv(),
            Ok(entities::AuctionEvent::AuctionCreated { .. })
        ));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_auction() {
        let context = TestContext::new(&["alice"]);
        assert_eq!(
            context.hidden_bid(uuid::Uuid::new_v4(), "alice", 60_000).await,
            Err(entities::AuctionError::AuctionNotFound)
        );
    }
}
