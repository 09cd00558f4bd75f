use {
    super::{
        Phase,
        Round,
    },
    crate::kernel::entities::{
        AccountId,
        Amount,
        AuctionId,
    },
    strum::Display,
};

/// Why funds leave the escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransferContext {
    Refund,
    SellerPayment,
    ResidualSweep,
    Teardown,
}

/// Observable state transitions, emitted in the order the operations committed.
#[derive(Clone, Debug, PartialEq)]
pub enum AuctionEvent {
    AuctionCreated {
        auction_id:  AuctionId,
        seller:      AccountId,
        good_amount: u64,
        min_bid:     Amount,
        deposit:     Amount,
    },
    HiddenBidReceived {
        auction_id: AuctionId,
        bidder:     AccountId,
        deposit:    Amount,
    },
    RoundClosed {
        auction_id: AuctionId,
        round:      Round,
        new_phase:  Phase,
    },
    ClosedWithNoBids {
        auction_id: AuctionId,
        round:      Round,
    },
    OpenBidReceived {
        auction_id: AuctionId,
        bidder:     AccountId,
        value:      Amount,
    },
    WinnerFound {
        auction_id: AuctionId,
        winner:     AccountId,
        bid:        Amount,
    },
    FundsTransferred {
        auction_id: AuctionId,
        context:    TransferContext,
        to:         AccountId,
        amount:     Amount,
    },
    TransferFailed {
        auction_id: AuctionId,
        context:    TransferContext,
        to:         AccountId,
        amount:     Amount,
        error:      String,
    },
    TokenRetrieved {
        auction_id: AuctionId,
        by:         AccountId,
    },
    AuctionDeleted {
        auction_id: AuctionId,
        by:         AccountId,
    },
}

impl AuctionEvent {
    pub fn auction_id(&self) -> AuctionId {
        match self {
            AuctionEvent::AuctionCreated { auction_id, .. }
            | AuctionEvent::HiddenBidReceived { auction_id, .. }
            | AuctionEvent::RoundClosed { auction_id, .. }
            | AuctionEvent::ClosedWithNoBids { auction_id, .. }
            | AuctionEvent::OpenBidReceived { auction_id, .. }
            | AuctionEvent::WinnerFound { auction_id, .. }
            | AuctionEvent::FundsTransferred { auction_id, .. }
            | AuctionEvent::TransferFailed { auction_id, .. }
            | AuctionEvent::TokenRetrieved { auction_id, .. }
            | AuctionEvent::AuctionDeleted { auction_id, .. } => *auction_id,
        }
    }
}
