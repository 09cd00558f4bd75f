use {
    crate::kernel::entities::{
        AccountId,
        Amount,
        AuctionId,
    },
    time::OffsetDateTime,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Winner {
    pub account: AccountId,
    pub bid:     Amount,
}

/// Non-transferable claim on the auctioned good, issued to the winner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub owner:       AccountId,
    pub auction_id:  AuctionId,
    pub good_amount: u64,
    pub created_at:  OffsetDateTime,
    pub valid_until: OffsetDateTime,
}

impl Token {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.valid_until
    }
}
