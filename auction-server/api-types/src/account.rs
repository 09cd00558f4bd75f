use {
    crate::{
        AccountId,
        Amount,
    },
    serde::{
        Deserialize,
        Serialize,
    },
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Balance {
    pub account: AccountId,
    pub amount:  Amount,
}
