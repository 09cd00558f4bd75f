use {
    std::fmt,
    uuid::Uuid,
};

pub type AccountId = String;
pub type Amount = u64;
pub type AuctionId = Uuid;

/// An account the ledger can move funds between.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LedgerAccount {
    Participant(AccountId),
    /// Funds held by an auction pending settlement.
    Escrow(AuctionId),
}

impl fmt::Display for LedgerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerAccount::Participant(account) => write!(f, "{}", account),
            LedgerAccount::Escrow(auction_id) => write!(f, "escrow:{}", auction_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_account_display() {
        let id = Uuid::nil();
        assert_eq!(
            LedgerAccount::Participant("alice".to_string()).to_string(),
            "alice"
        );
        assert_eq!(
            LedgerAccount::Escrow(id).to_string(),
            "escrow:00000000-0000-0000-0000-000000000000"
        );
    }
}
