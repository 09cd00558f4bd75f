use {
    super::{
        entities,
        repository::Repository,
    },
    crate::kernel::{
        clock::Clock,
        entities::{
            AccountId,
            AuctionId,
        },
        ledger::Ledger,
    },
    std::sync::Arc,
    tokio::sync::broadcast,
    tokio_util::task::TaskTracker,
};

pub mod close_hidden_round;
pub mod close_open_round;
pub mod create_auction;
pub mod delete_auction;
pub mod get_auction;
pub mod retrieve_token;
pub mod reveal_bid;
pub mod settle_auction;
pub mod submit_hidden_bid;
pub mod workers;

pub struct Config {
    /// Account allowed to delete any auction besides its seller.
    pub admin:  AccountId,
    pub timing: entities::AuctionTiming,
}

pub struct ServiceInner {
    config:       Config,
    repo:         Arc<Repository>,
    ledger:       Arc<dyn Ledger>,
    clock:        Arc<dyn Clock>,
    event_sender: broadcast::Sender<entities::AuctionEvent>,
    task_tracker: TaskTracker,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);
impl std::ops::Deref for Service {
    type Target = ServiceInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(
        config: Config,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
        event_sender: broadcast::Sender<entities::AuctionEvent>,
        task_tracker: TaskTracker,
    ) -> Self {
        Self(Arc::new(ServiceInner {
            config,
            repo: Arc::new(Repository::new()),
            ledger,
            clock,
            event_sender,
            task_tracker,
        }))
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    async fn get_auction_lock(
        &self,
        auction_id: AuctionId,
    ) -> Result<entities::AuctionLock, entities::AuctionError> {
        self.repo
            .get_in_memory_auction_lock(auction_id)
            .await
            .ok_or(entities::AuctionError::AuctionNotFound)
    }

    /// Call while still holding the auction lock so events leave in commit order.
    fn emit(&self, events: Vec<entities::AuctionEvent>) {
        for event in events {
            tracing::info!(auction_id = %event.auction_id(), event = ?event, "Auction event");
            if self.event_sender.send(event).is_err() {
                tracing::trace!("No subscribers for auction events");
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use {
        super::*,
        crate::kernel::{
            clock::tests::ManualClock,
            commitment,
            entities::{
                Amount,
                LedgerAccount,
            },
            ledger::tests::FlakyLedger,
            test_utils::{
                genesis_time,
                ADMIN,
                SELLER,
            },
        },
        time::Duration,
    };

    pub const MIN_BID: Amount = 50_000;
    pub const DEPOSIT: Amount = 100_000;
    pub const INITIAL_BALANCE: Amount = 1_000_000;

    pub struct TestContext {
        pub service: Service,
        pub ledger:  Arc<FlakyLedger>,
        pub clock:   Arc<ManualClock>,
        pub events:  broadcast::Receiver<entities::AuctionEvent>,
    }

    impl Service {
        pub fn new_with_ledger(
            ledger: Arc<dyn Ledger>,
            clock: Arc<ManualClock>,
        ) -> (Self, broadcast::Receiver<entities::AuctionEvent>) {
            let (event_sender, event_receiver) = broadcast::channel(1000);
            let service = Service::new(
                Config {
                    admin:  ADMIN.to_string(),
                    timing: entities::AuctionTiming::default(),
                },
                ledger,
                clock,
                event_sender,
                TaskTracker::new(),
            );
            (service, event_receiver)
        }
    }

    pub fn participant(account: &str) -> LedgerAccount {
        LedgerAccount::Participant(account.to_string())
    }

    pub fn salt(bidder: &str) -> Vec<u8> {
        format!("salt-of-{}", bidder).into_bytes()
    }

    impl TestContext {
        pub fn new(bidders: &[&str]) -> Self {
            let ledger = Arc::new(FlakyLedger::new(
                bidders
                    .iter()
                    .map(|bidder| (participant(bidder), INITIAL_BALANCE)),
            ));
            let clock = Arc::new(ManualClock::new(genesis_time()));
            let (service, events) = Service::new_with_ledger(ledger.clone(), clock.clone());
            Self {
                service,
                ledger,
                clock,
                events,
            }
        }

        pub async fn create_auction(&self) -> AuctionId {
            self.service
                .create_auction(create_auction::CreateAuctionInput {
                    params: entities::AuctionParams {
                        seller:      SELLER.to_string(),
                        good_amount: 1,
                        min_bid:     MIN_BID,
                        deposit:     DEPOSIT,
                    },
                })
                .await
                .unwrap()
                .id
        }

        pub async fn hidden_bid(
            &self,
            auction_id: AuctionId,
            bidder: &str,
            value: Amount,
        ) -> Result<(), entities::AuctionError> {
            self.service
                .submit_hidden_bid(submit_hidden_bid::SubmitHiddenBidInput {
                    auction_id,
                    bidder: bidder.to_string(),
                    commitment: commitment::commit(value, &salt(bidder)),
                    deposit: DEPOSIT,
                })
                .await
        }

        pub async fn reveal(
            &self,
            auction_id: AuctionId,
            bidder: &str,
            value: Amount,
        ) -> Result<(), entities::AuctionError> {
            self.service
                .reveal_bid(reveal_bid::RevealBidInput {
                    auction_id,
                    bidder: bidder.to_string(),
                    value,
                    salt: salt(bidder),
                })
                .await
        }

        pub fn pass_hidden_deadline(&self) {
            self.clock
                .set(genesis_time() + Duration::days(1) + Duration::seconds(1));
        }

        pub fn pass_open_deadline(&self) {
            self.clock
                .set(genesis_time() + Duration::days(2) + Duration::seconds(1));
        }

        pub async fn balance(&self, account: &str) -> Amount {
            self.ledger.balance_of(&participant(account)).await
        }

        pub async fn escrow_balance(&self, auction_id: AuctionId) -> Amount {
            self.ledger
                .balance_of(&LedgerAccount::Escrow(auction_id))
                .await
        }

        pub fn drain_events(&mut self) -> Vec<entities::AuctionEvent> {
            let mut events = vec![];
            while let Ok(event) = self.events.try_recv() {
                events.push(event);
            }
            events
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_auctions_do_not_contend() {
        let context = TestContext::new(&["alice", "bob"]);
        let busy = context.create_auction().await;
        let idle = context.create_auction().await;

        let lock = context.service.get_auction_lock(busy).await.unwrap();
        let _guard = lock.lock().await;

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            context.hidden_bid(idle, "alice", 60_000),
        )
        .await;
        assert!(matches!(result, Ok(Ok(()))));

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            context.hidden_bid(busy, "bob", 60_000),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(context.escrow_balance(busy).await, 0);
    }
}
