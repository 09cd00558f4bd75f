use {
    super::Phase,
    crate::kernel::{
        entities::Amount,
        ledger::TransferError,
    },
    std::fmt,
    time::OffsetDateTime,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuctionError {
    /// The arguments of the operation are not acceptable
    InvalidParameters(String),
    /// No live auction exists under the given id
    AuctionNotFound,
    /// The operation is not legal in the current phase
    InvalidState {
        operation: &'static str,
        phase:     Phase,
    },
    /// The operation had to happen strictly before the deadline
    DeadlinePassed { deadline: OffsetDateTime },
    /// The operation can only happen strictly after the deadline
    DeadlineNotYetReached { deadline: OffsetDateTime },
    InsufficientDeposit { required: Amount, sent: Amount },
    BidTooLow { min_bid: Amount, value: Amount },
    /// The revealed value and salt do not open the stored commitment
    CommitmentMismatch,
    NoHiddenBid,
    AlreadyRevealed,
    NotWinner,
    NoWinnerCandidate,
    Unauthorized,
    NotDeletable,
    TransferFailed(TransferError),
}

impl fmt::Display for AuctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionError::InvalidParameters(msg) => write!(f, "Invalid parameters: {}", msg),
            AuctionError::AuctionNotFound => write!(f, "Auction with the specified id was not found"),
            AuctionError::InvalidState { operation, phase } => {
                write!(f, "Cannot {} while the auction is in phase {}", operation, phase)
            }
            AuctionError::DeadlinePassed { deadline } => {
                write!(f, "Deadline {} has passed", deadline)
            }
            AuctionError::DeadlineNotYetReached { deadline } => {
                write!(f, "Deadline {} has not been reached yet", deadline)
            }
            AuctionError::InsufficientDeposit { required, sent } => write!(
                f,
                "Insufficient deposit: required {}, sent {}",
                required, sent
            ),
            AuctionError::BidTooLow { min_bid, value } => {
                write!(f, "Bid {} is below the minimum bid {}", value, min_bid)
            }
            AuctionError::CommitmentMismatch => {
                write!(f, "Revealed value and salt do not match the commitment")
            }
            AuctionError::NoHiddenBid => write!(f, "No hidden bid was submitted by this bidder"),
            AuctionError::AlreadyRevealed => write!(f, "Bid was already revealed"),
            AuctionError::NotWinner => write!(f, "Caller is not the winner of the auction"),
            AuctionError::NoWinnerCandidate => write!(f, "No valid bid to select a winner from"),
            AuctionError::Unauthorized => write!(f, "Caller is not allowed to perform this action"),
            AuctionError::NotDeletable => write!(f, "Auction cannot be deleted yet"),
            AuctionError::TransferFailed(err) => write!(f, "Transfer failed: {}", err),
        }
    }
}

impl std::error::Error for AuctionError {}

impl From<TransferError> for AuctionError {
    fn from(err: TransferError) -> Self {
        AuctionError::TransferFailed(err)
    }
}
