use {
    crate::{
        AccountId,
        Amount,
        UnixTimestamp,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    serde_with::{
        base64::{
            Base64,
            Standard,
        },
        formats::Padded,
        serde_as,
        DeserializeAs,
        SerializeAs,
    },
    strum::Display,
    uuid::Uuid,
};

pub type AuctionId = Uuid;

/// Sha256 commitment over a bid value and a secret salt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Commitment(pub [u8; 32]);

impl Serialize for Commitment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Base64::<Standard, Padded>::serialize_as(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D>(deserializer: D) -> Result<Commitment, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = Base64::<Standard, Padded>::deserialize_as(deserializer)?;
        Ok(Commitment(bytes))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    HiddenBidding,
    OpenBidding,
    Closed,
    ReadyForDeletion,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreateAuction {
    /// The account that sells the good and receives the settlement proceeds.
    pub seller:      AccountId,
    /// Quantity of the auctioned good.
    pub good_amount: u64,
    /// Minimum value a revealed bid must have to be valid.
    pub min_bid:     Amount,
    /// Deposit every hidden bid has to escrow.
    pub deposit:     Amount,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuctionCreated {
    pub id: AuctionId,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeleteAuction {
    pub caller: AccountId,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubmitHiddenBid {
    pub bidder:     AccountId,
    pub commitment: Commitment,
    /// Amount moved from the bidder to the auction escrow.
    pub deposit:    Amount,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RevealBid {
    pub bidder: AccountId,
    pub value:  Amount,
    #[serde_as(as = "Base64")]
    pub salt:   Vec<u8>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RetrieveToken {
    pub caller: AccountId,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PhaseResult {
    pub phase: Phase,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Winner {
    pub account: AccountId,
    pub bid:     Amount,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Token {
    pub owner:       AccountId,
    pub auction_id:  AuctionId,
    pub good_amount: u64,
    pub created_at:  UnixTimestamp,
    pub valid_until: UnixTimestamp,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenValidity {
    /// Absent until a winner was found.
    pub valid_until: Option<UnixTimestamp>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transfer {
    pub to:     AccountId,
    pub amount: Amount,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FailedTransfer {
    pub to:     AccountId,
    pub amount: Amount,
    pub reason: String,
    pub error:  String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settlement {
    pub phase:     Phase,
    pub transfers: Vec<Transfer>,
    pub failures:  Vec<FailedTransfer>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Auction {
    pub id:                AuctionId,
    pub seller:            AccountId,
    pub good_amount:       u64,
    pub min_bid:           Amount,
    pub deposit:           Amount,
    pub created_at:        UnixTimestamp,
    pub hidden_deadline:   UnixTimestamp,
    pub open_deadline:     UnixTimestamp,
    pub phase:             Phase,
    pub bidders:           usize,
    pub winner:            Option<Winner>,
    pub token_valid_until: Option<UnixTimestamp>,
    pub seller_paid:       bool,
    pub refunds_pending:   usize,
}
