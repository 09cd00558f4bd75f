//! Commit-reveal scheme binding a bidder to a bid value.
//!
//! A commitment is `sha256(value_be_bytes || salt)`. The same function is used when the
//! bid is sealed and when it is revealed.

use {
    super::entities::Amount,
    sha2::{
        Digest,
        Sha256,
    },
};

pub use sealed_auction_api_types::auction::Commitment;

pub fn commit(value: Amount, salt: &[u8]) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(value.to_be_bytes());
    hasher.update(salt);
    Commitment(hasher.finalize().into())
}

pub fn verify(commitment: &Commitment, value: Amount, salt: &[u8]) -> bool {
    commit(value, salt) == *commitment
}
