use {
    super::{
        AuctionError,
        BidRegistry,
        Token,
        TransferContext,
        Winner,
    },
    crate::kernel::{
        commitment::{
            self,
            Commitment,
        },
        entities::{
            AccountId,
            Amount,
            AuctionId,
        },
    },
    std::collections::HashSet,
    strum::Display,
    time::{
        Duration,
        OffsetDateTime,
    },
};

pub type AuctionLock = std::sync::Arc<tokio::sync::Mutex<Auction>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    HiddenBidding,
    OpenBidding,
    Closed,
    ReadyForDeletion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Round {
    Hidden,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuctionTiming {
    pub hidden_round_duration: Duration,
    pub open_round_duration:   Duration,
    pub token_validity:        Duration,
}

impl Default for AuctionTiming {
    fn default() -> Self {
        Self {
            hidden_round_duration: Duration::days(1),
            open_round_duration:   Duration::days(1),
            token_validity:        Duration::weeks(12),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionParams {
    pub seller:      AccountId,
    pub good_amount: u64,
    pub min_bid:     Amount,
    pub deposit:     Amount,
}

/// Immutable once the auction is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionConfig {
    pub seller:          AccountId,
    pub good_amount:     u64,
    pub min_bid:         Amount,
    pub deposit:         Amount,
    pub created_at:      OffsetDateTime,
    pub hidden_deadline: OffsetDateTime,
    pub open_deadline:   OffsetDateTime,
    pub token_validity:  Duration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementProgress {
    pub refunded:    HashSet<AccountId>,
    pub seller_paid: bool,
}

/// A transfer out of the escrow that settlement still owes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    pub to:      AccountId,
    pub amount:  Amount,
    pub context: TransferContext,
}

#[derive(Clone, Debug)]
pub struct Auction {
    pub id:         AuctionId,
    pub config:     AuctionConfig,
    pub phase:      Phase,
    pub bids:       BidRegistry,
    pub winner:     Option<Winner>,
    pub token:      Option<Token>,
    pub settlement: SettlementProgress,
    pub released:   bool,
}

impl Auction {
    pub fn try_new(
        id: AuctionId,
        params: AuctionParams,
        timing: &AuctionTiming,
        now: OffsetDateTime,
    ) -> Result<Self, AuctionError> {
        if params.seller.is_empty() {
            return Err(AuctionError::InvalidParameters(
                "Seller must not be empty".to_string(),
            ));
        }
        if timing.hidden_round_duration <= Duration::ZERO
            || timing.open_round_duration <= Duration::ZERO
        {
            return Err(AuctionError::InvalidParameters(
                "Round durations must be positive".to_string(),
            ));
        }
        let deadline_overflow =
            || AuctionError::InvalidParameters("Deadline is out of range".to_string());
        let hidden_deadline = now
            .checked_add(timing.hidden_round_duration)
            .ok_or_else(deadline_overflow)?;
        let open_deadline = hidden_deadline
            .checked_add(timing.open_round_duration)
            .ok_or_else(deadline_overflow)?;

        Ok(Self {
            id,
            config: AuctionConfig {
                seller: params.seller,
                good_amount: params.good_amount,
                min_bid: params.min_bid,
                deposit: params.deposit,
                created_at: now,
                hidden_deadline,
                open_deadline,
                token_validity: timing.token_validity,
            },
            phase: Phase::HiddenBidding,
            bids: BidRegistry::default(),
            winner: None,
            token: None,
            settlement: SettlementProgress::default(),
            released: false,
        })
    }

    pub fn ensure_live(&self) -> Result<(), AuctionError> {
        if self.released {
            return Err(AuctionError::AuctionNotFound);
        }
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> AuctionError {
        AuctionError::InvalidState {
            operation,
            phase: self.phase,
        }
    }

    /// Checks every precondition of a hidden bid without mutating anything.
    pub fn check_hidden_bid(&self, deposit: Amount, now: OffsetDateTime) -> Result<(), AuctionError> {
        self.ensure_live()?;
        match self.phase {
            Phase::HiddenBidding => {}
            Phase::OpenBidding | Phase::Closed | Phase::ReadyForDeletion => {
                return Err(self.invalid_state("submit a hidden bid"))
            }
        }
        if now >= self.config.hidden_deadline {
            return Err(AuctionError::DeadlinePassed {
                deadline: self.config.hidden_deadline,
            });
        }
        if deposit < self.config.deposit {
            return Err(AuctionError::InsufficientDeposit {
                required: self.config.deposit,
                sent:     deposit,
            });
        }
        Ok(())
    }

    /// Must follow a successful [`Auction::check_hidden_bid`] and escrow transfer.
    pub fn record_hidden_bid(
        &mut self,
        bidder: AccountId,
        commitment: Commitment,
        deposit: Amount,
    ) -> bool {
        self.bids.upsert(bidder, commitment, deposit)
    }

    pub fn close_hidden_round(&mut self, now: OffsetDateTime) -> Result<Phase, AuctionError> {
        self.ensure_live()?;
        match self.phase {
            Phase::HiddenBidding => {}
            Phase::OpenBidding | Phase::Closed | Phase::ReadyForDeletion => {
                return Err(self.invalid_state("close the hidden round"))
            }
        }
        if now <= self.config.hidden_deadline {
            return Err(AuctionError::DeadlineNotYetReached {
                deadline: self.config.hidden_deadline,
            });
        }
        self.phase = if self.bids.is_empty() {
            Phase::ReadyForDeletion
        } else {
            Phase::OpenBidding
        };
        Ok(self.phase)
    }

    pub fn reveal_bid(
        &mut self,
        bidder: &AccountId,
        value: Amount,
        salt: &[u8],
        now: OffsetDateTime,
    ) -> Result<(), AuctionError> {
        self.ensure_live()?;
        match self.phase {
            Phase::OpenBidding => {}
            Phase::HiddenBidding | Phase::Closed | Phase::ReadyForDeletion => {
                return Err(self.invalid_state("reveal a bid"))
            }
        }
        if now >= self.config.open_deadline {
            return Err(AuctionError::DeadlinePassed {
                deadline: self.config.open_deadline,
            });
        }
        let min_bid = self.config.min_bid;
        let bid = self.bids.get_mut(bidder).ok_or(AuctionError::NoHiddenBid)?;
        if bid.is_reveal_valid() {
            return Err(AuctionError::AlreadyRevealed);
        }
        // A wrong opening is reported as such even when the value is also below the minimum.
        if !commitment::verify(&bid.commitment, value, salt) {
            return Err(AuctionError::CommitmentMismatch);
        }
        if value < min_bid {
            return Err(AuctionError::BidTooLow { min_bid, value });
        }
        bid.revealed_value = Some(value);
        Ok(())
    }

    pub fn close_open_round(&mut self, now: OffsetDateTime) -> Result<Phase, AuctionError> {
        self.ensure_live()?;
        match self.phase {
            Phase::OpenBidding => {}
            Phase::HiddenBidding | Phase::Closed | Phase::ReadyForDeletion => {
                return Err(self.invalid_state("close the open round"))
            }
        }
        if now <= self.config.open_deadline {
            return Err(AuctionError::DeadlineNotYetReached {
                deadline: self.config.open_deadline,
            });
        }
        self.phase = if self.bids.valid_bids().next().is_none() {
            Phase::ReadyForDeletion
        } else {
            Phase::Closed
        };
        Ok(self.phase)
    }

    /// Picks the highest valid bid; on a tie the bidder registered first wins.
    pub fn find_winner(&mut self, now: OffsetDateTime) -> Result<Winner, AuctionError> {
        match self.phase {
            Phase::Closed => {}
            Phase::HiddenBidding | Phase::OpenBidding | Phase::ReadyForDeletion => {
                return Err(self.invalid_state("find the winner"))
            }
        }
        if self.winner.is_some() {
            return Err(self.invalid_state("find the winner twice"));
        }

        let mut best: Option<(&AccountId, Amount)> = None;
        for (bidder, value) in self.bids.valid_bids() {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((bidder, value)),
            }
        }
        let (account, bid) = best.ok_or(AuctionError::NoWinnerCandidate)?;
        let winner = Winner {
            account: account.clone(),
            bid,
        };

        let valid_until = now.saturating_add(self.config.token_validity);
        self.token = Some(Token {
            owner: winner.account.clone(),
            auction_id: self.id,
            good_amount: self.config.good_amount,
            created_at: now,
            valid_until,
        });
        self.winner = Some(winner.clone());
        Ok(winner)
    }

    /// Settlement is possible once a winner exists, also after the token was retrieved.
    pub fn ensure_settleable(&self) -> Result<&Winner, AuctionError> {
        self.ensure_live()?;
        match self.phase {
            Phase::Closed | Phase::ReadyForDeletion => {}
            Phase::HiddenBidding | Phase::OpenBidding => {
                return Err(self.invalid_state("settle"))
            }
        }
        self.winner.as_ref().ok_or(AuctionError::NoWinnerCandidate)
    }

    /// Refunds not paid yet, in registration order. Bidders without a valid reveal forfeit
    /// their deposit and get nothing.
    pub fn pending_refunds(&self) -> Vec<Payout> {
        let Some(winner) = self.winner.as_ref() else {
            return vec![];
        };
        self.bids
            .iter()
            .filter(|(bidder, _)| !self.settlement.refunded.contains(*bidder))
            .filter_map(|(bidder, bid)| {
                let value = bid.revealed_value?;
                let amount = if *bidder == winner.account {
                    bid.deposit_held.saturating_sub(value)
                } else {
                    bid.deposit_held
                };
                (amount > 0).then(|| Payout {
                    to: bidder.clone(),
                    amount,
                    context: TransferContext::Refund,
                })
            })
            .collect()
    }

    pub fn outstanding_refunds(&self) -> Amount {
        self.pending_refunds()
            .iter()
            .map(|payout| payout.amount)
            .sum()
    }

    /// The seller receives at most the configured deposit from the winning bid itself.
    pub fn pending_seller_payment(&self) -> Option<Payout> {
        if self.settlement.seller_paid {
            return None;
        }
        self.winner.as_ref().map(|winner| Payout {
            to:      self.config.seller.clone(),
            amount:  winner.bid.min(self.config.deposit),
            context: TransferContext::SellerPayment,
        })
    }

    pub fn mark_paid(&mut self, payout: &Payout) {
        match payout.context {
            TransferContext::Refund => {
                self.settlement.refunded.insert(payout.to.clone());
            }
            TransferContext::SellerPayment => self.settlement.seller_paid = true,
            TransferContext::ResidualSweep | TransferContext::Teardown => {}
        }
    }

    pub fn retrieve_token(
        &mut self,
        caller: &AccountId,
        now: OffsetDateTime,
    ) -> Result<Token, AuctionError> {
        self.ensure_live()?;
        match self.phase {
            Phase::Closed => {}
            Phase::HiddenBidding | Phase::OpenBidding | Phase::ReadyForDeletion => {
                return Err(self.invalid_state("retrieve the token"))
            }
        }
        if now <= self.config.open_deadline {
            return Err(AuctionError::DeadlineNotYetReached {
                deadline: self.config.open_deadline,
            });
        }
        let winner = self.winner.as_ref().ok_or(AuctionError::NoWinnerCandidate)?;
        if winner.account != *caller {
            return Err(AuctionError::NotWinner);
        }
        let token = self.token.clone().ok_or(AuctionError::NoWinnerCandidate)?;
        self.phase = Phase::ReadyForDeletion;
        Ok(token)
    }

    pub fn is_deletable(&self, now: OffsetDateTime) -> bool {
        let token_expired = self
            .token
            .as_ref()
            .is_some_and(|token| token.is_expired(now));
        token_expired || self.phase == Phase::ReadyForDeletion
    }

    pub fn token_valid_until(&self) -> Option<OffsetDateTime> {
        self.token.as_ref().map(|token| token.valid_until)
    }

    pub fn release(&mut self) {
        self.released = true;
    }
}
