use crate::{
    auction::service::Service,
    kernel::ledger::Ledger,
};

pub struct Store {
    pub auction_service: Service,
}

impl Store {
    pub fn ledger(&self) -> &dyn Ledger {
        self.auction_service.ledger().as_ref()
    }
}
