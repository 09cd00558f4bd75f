#[cfg(test)]
use mockall::automock;
use {
    super::entities::{
        Amount,
        LedgerAccount,
    },
    axum::async_trait,
    std::{
        collections::HashMap,
        fmt::{
            self,
            Debug,
        },
    },
    tokio::sync::RwLock,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    InsufficientFunds {
        account:   LedgerAccount,
        balance:   Amount,
        requested: Amount,
    },
    /// The ledger could not apply the transfer, nothing was moved.
    Unavailable(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::InsufficientFunds {
                account,
                balance,
                requested,
            } => write!(
                f,
                "Insufficient funds in {}: balance {} < requested {}",
                account, balance, requested
            ),
            TransferError::Unavailable(reason) => write!(f, "Ledger unavailable: {}", reason),
        }
    }
}

impl std::error::Error for TransferError {}

/// Atomic fund movement between participants and auction escrows.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Ledger: Debug + Send + Sync + 'static {
    async fn transfer(
        &self,
        from: &LedgerAccount,
        to: &LedgerAccount,
        amount: Amount,
    ) -> Result<(), TransferError>;
    async fn balance_of(&self, account: &LedgerAccount) -> Amount;
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<LedgerAccount, Amount>>,
}

impl InMemoryLedger {
    pub fn new(initial_balances: impl IntoIterator<Item = (LedgerAccount, Amount)>) -> Self {
        Self {
            balances: RwLock::new(initial_balances.into_iter().collect()),
        }
    }

    pub async fn total_supply(&self) -> Amount {
        self.balances.read().await.values().sum()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn transfer(
        &self,
        from: &LedgerAccount,
        to: &LedgerAccount,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if amount == 0 || from == to {
            return Ok(());
        }
        let mut balances = self.balances.write().await;
        let balance = balances.get(from).copied().unwrap_or_default();
        if balance < amount {
            return Err(TransferError::InsufficientFunds {
                account: from.clone(),
                balance,
                requested: amount,
            });
        }
        let receiver_balance = balances.get(to).copied().unwrap_or_default();
        let receiver_balance = receiver_balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::Unavailable(format!("Balance overflow for {}", to)))?;
        balances.insert(from.clone(), balance - amount);
        balances.insert(to.clone(), receiver_balance);
        tracing::debug!(from = %from, to = %to, amount, "Ledger transfer applied");
        Ok(())
    }

    async fn balance_of(&self, account: &LedgerAccount) -> Amount {
        self.balances
            .read()
            .await
            .get(account)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub mod tests {
    use {
        super::*,
        std::collections::HashSet,
        tokio::sync::Mutex,
    };

    /// In-memory ledger that rejects transfers to selected accounts until they are healed.
    #[derive(Debug, Default)]
    pub struct FlakyLedger {
        pub inner:   InMemoryLedger,
        failing_to:  Mutex<HashSet<LedgerAccount>>,
        failing_all: Mutex<bool>,
    }

    impl FlakyLedger {
        pub fn new(initial_balances: impl IntoIterator<Item = (LedgerAccount, Amount)>) -> Self {
            Self {
                inner: InMemoryLedger::new(initial_balances),
                ..Default::default()
            }
        }

        pub async fn fail_transfers_to(&self, account: LedgerAccount) {
            self.failing_to.lock().await.insert(account);
        }

        pub async fn fail_all_transfers(&self, fail: bool) {
            *self.failing_all.lock().await = fail;
        }

        pub async fn heal(&self) {
            self.failing_to.lock().await.clear();
            *self.failing_all.lock().await = false;
        }
    }

    #[async_trait]
    impl Ledger for FlakyLedger {
        async fn transfer(
            &self,
            from: &LedgerAccount,
            to: &LedgerAccount,
            amount: Amount,
        ) -> Result<(), TransferError> {
            if *self.failing_all.lock().await || self.failing_to.lock().await.contains(to) {
                return Err(TransferError::Unavailable(format!("Injected failure to {}", to)));
            }
            self.inner.transfer(from, to, amount).await
        }

        async fn balance_of(&self, account: &LedgerAccount) -> Amount {
            self.inner.balance_of(account).await
        }
    }

    fn alice() -> LedgerAccount {
        LedgerAccount::Participant("alice".to_string())
    }

    fn bob() -> LedgerAccount {
        LedgerAccount::Participant("bob".to_string())
    }

    #[tokio::test]
    async fn test_transfer_moves_funds() {
        let ledger = InMemoryLedger::new([(alice(), 100)]);
        ledger.transfer(&alice(), &bob(), 40).await.unwrap();
        assert_eq!(ledger.balance_of(&alice()).await, 60);
        assert_eq!(ledger.balance_of(&bob()).await, 40);
        assert_eq!(ledger.total_supply().await, 100);
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds() {
        let ledger = InMemoryLedger::new([(alice(), 10)]);
        let result = ledger.transfer(&alice(), &bob(), 11).await;
        assert_eq!(
            result,
            Err(TransferError::InsufficientFunds {
                account:   alice(),
                balance:   10,
                requested: 11,
            })
        );
        assert_eq!(ledger.balance_of(&alice()).await, 10);
        assert_eq!(ledger.balance_of(&bob()).await, 0);
    }

    #[tokio::test]
    async fn test_zero_transfer_is_noop() {
        let ledger = InMemoryLedger::default();
        ledger.transfer(&alice(), &bob(), 0).await.unwrap();
        assert_eq!(ledger.total_supply().await, 0);
    }

    #[tokio::test]
    async fn test_flaky_ledger_heals() {
        let ledger = FlakyLedger::new([(alice(), 10)]);
        ledger.fail_transfers_to(bob()).await;
        assert!(ledger.transfer(&alice(), &bob(), 5).await.is_err());
        ledger.heal().await;
        ledger.transfer(&alice(), &bob(), 5).await.unwrap();
        assert_eq!(ledger.balance_of(&bob()).await, 5);
    }
}
