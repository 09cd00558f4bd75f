use {
    serde::{
        Deserialize,
        Serialize,
    },
    strum::AsRefStr,
};

pub mod account;
pub mod auction;

pub type AccountId = String;
pub type Amount = u64;
pub type UnixTimestamp = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBodyResponse {
    pub error: String,
}

#[derive(AsRefStr, Clone, Copy, Debug)]
#[strum(prefix = "/")]
pub enum Route {
    #[strum(serialize = "v1")]
    V1,
    #[strum(serialize = "auctions")]
    Auction,
    #[strum(serialize = "accounts")]
    Account,
    #[strum(serialize = "")]
    Root,
    #[strum(serialize = "live")]
    Liveness,
}
