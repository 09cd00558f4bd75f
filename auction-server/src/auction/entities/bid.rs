use {
    crate::kernel::{
        commitment::Commitment,
        entities::{
            AccountId,
            Amount,
        },
    },
    std::collections::HashMap,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Bid {
    pub commitment:     Commitment,
    /// Set only by a reveal that matched the commitment and met the minimum bid.
    pub revealed_value: Option<Amount>,
    /// Total amount this bidder has moved into the escrow.
    pub deposit_held:   Amount,
}

impl Bid {
    pub fn is_reveal_valid(&self) -> bool {
        self.revealed_value.is_some()
    }
}

/// Bids keyed by bidder, iterated in the order bidders first submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BidRegistry {
    order: Vec<AccountId>,
    bids:  HashMap<AccountId, Bid>,
}

impl BidRegistry {
    /// Returns true when the bidder was not registered before.
    pub fn upsert(&mut self, bidder: AccountId, commitment: Commitment, deposit: Amount) -> bool {
        match self.bids.get_mut(&bidder) {
            Some(bid) => {
                bid.commitment = commitment;
                bid.deposit_held = bid.deposit_held.saturating_add(deposit);
                false
            }
            None => {
                self.order.push(bidder.clone());
                self.bids.insert(
                    bidder,
                    Bid {
                        commitment,
                        revealed_value: None,
                        deposit_held: deposit,
                    },
                );
                true
            }
        }
    }

    pub fn get(&self, bidder: &AccountId) -> Option<&Bid> {
        self.bids.get(bidder)
    }

    pub fn get_mut(&mut self, bidder: &AccountId) -> Option<&mut Bid> {
        self.bids.get_mut(bidder)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &Bid)> {
        self.order
            .iter()
            .filter_map(|bidder| self.bids.get(bidder).map(|bid| (bidder, bid)))
    }

    pub fn valid_bids(&self) -> impl Iterator<Item = (&AccountId, Amount)> {
        self.iter()
            .filter_map(|(bidder, bid)| bid.revealed_value.map(|value| (bidder, value)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
