use {
    super::{
        entities,
        service::{
            close_hidden_round::CloseHiddenRoundInput,
            close_open_round::CloseOpenRoundInput,
            create_auction::CreateAuctionInput,
            delete_auction::DeleteAuctionInput,
            get_auction::GetAuctionInput,
            retrieve_token::RetrieveTokenInput,
            reveal_bid::RevealBidInput,
            settle_auction::{
                SettleAuctionInput,
                SettlementReport,
            },
            submit_hidden_bid::SubmitHiddenBidInput,
        },
    },
    crate::{
        api::RestError,
        state::Store,
    },
    axum::{
        extract::{
            Path,
            State,
        },
        routing::{
            get,
            post,
        },
        Json,
        Router,
    },
    sealed_auction_api_types::auction::{
        Auction,
        AuctionCreated,
        AuctionId,
        CreateAuction,
        DeleteAuction,
        FailedTransfer,
        Phase,
        PhaseResult,
        RetrieveToken,
        RevealBid,
        Settlement,
        SubmitHiddenBid,
        Token,
        TokenValidity,
        Transfer,
        Winner,
    },
    std::sync::Arc,
    time::OffsetDateTime,
};

/// Open a new auction. Both rounds start counting from now.
pub async fn post_auction(
    State(store): State<Arc<Store>>,
    Json(create): Json<CreateAuction>,
) -> Result<Json<AuctionCreated>, RestError> {
    let auction = store
        .auction_service
        .create_auction(CreateAuctionInput {
            params: entities::AuctionParams {
                seller:      create.seller,
                good_amount: create.good_amount,
                min_bid:     create.min_bid,
                deposit:     create.deposit,
            },
        })
        .await?;
    Ok(Json(AuctionCreated { id: auction.id }))
}

pub async fn get_auction(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<Auction>, RestError> {
    let auction = store
        .auction_service
        .get_auction(GetAuctionInput { auction_id })
        .await?;
    Ok(Json(auction.into()))
}

pub async fn get_phase(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<PhaseResult>, RestError> {
    let phase = store
        .auction_service
        .get_current_state(GetAuctionInput { auction_id })
        .await?;
    Ok(Json(PhaseResult {
        phase: phase.into(),
    }))
}

/// Expiry of the winner's token.
pub async fn get_token_valid_until(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<TokenValidity>, RestError> {
    let valid_until = store
        .auction_service
        .get_token_valid_until(GetAuctionInput { auction_id })
        .await?;
    Ok(Json(TokenValidity {
        valid_until: valid_until.map(to_unix),
    }))
}

/// Delete a finished auction. Only the seller and the admin are allowed to.
pub async fn delete_auction(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
    Json(delete): Json<DeleteAuction>,
) -> Result<Json<()>, RestError> {
    store
        .auction_service
        .delete_auction(DeleteAuctionInput {
            auction_id,
            caller: delete.caller,
        })
        .await?;
    Ok(Json(()))
}

/// Submit a sealed bid. The deposit is moved into the auction escrow.
pub async fn post_hidden_bid(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
    Json(bid): Json<SubmitHiddenBid>,
) -> Result<Json<()>, RestError> {
    store
        .auction_service
        .submit_hidden_bid(SubmitHiddenBidInput {
            auction_id,
            bidder: bid.bidder,
            commitment: bid.commitment,
            deposit: bid.deposit,
        })
        .await?;
    Ok(Json(()))
}

pub async fn post_reveal(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
    Json(reveal): Json<RevealBid>,
) -> Result<Json<()>, RestError> {
    store
        .auction_service
        .reveal_bid(RevealBidInput {
            auction_id,
            bidder: reveal.bidder,
            value: reveal.value,
            salt: reveal.salt,
        })
        .await?;
    Ok(Json(()))
}

pub async fn post_close_hidden_round(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<PhaseResult>, RestError> {
    let phase = store
        .auction_service
        .close_hidden_round(CloseHiddenRoundInput { auction_id })
        .await?;
    Ok(Json(PhaseResult {
        phase: phase.into(),
    }))
}

/// Close the reveal round. When a winner exists the response lists the settlement transfers.
pub async fn post_close_open_round(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<Settlement>, RestError> {
    let report = store
        .auction_service
        .close_open_round(CloseOpenRoundInput { auction_id })
        .await?;
    Ok(Json(report.into()))
}

/// Retry the payouts a previous settlement could not make.
pub async fn post_settle(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
) -> Result<Json<Settlement>, RestError> {
    let report = store
        .auction_service
        .settle_auction(SettleAuctionInput { auction_id })
        .await?;
    Ok(Json(report.into()))
}

pub async fn post_retrieve_token(
    State(store): State<Arc<Store>>,
    Path(auction_id): Path<AuctionId>,
    Json(retrieve): Json<RetrieveToken>,
) -> Result<Json<Token>, RestError> {
    let token = store
        .auction_service
        .retrieve_token(RetrieveTokenInput {
            auction_id,
            caller: retrieve.caller,
        })
        .await?;
    Ok(Json(token.into()))
}

pub fn get_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/", post(post_auction))
        .route("/:auction_id", get(get_auction).delete(delete_auction))
        .route("/:auction_id/phase", get(get_phase))
        .route("/:auction_id/token_valid_until", get(get_token_valid_until))
        .route("/:auction_id/hidden_bids", post(post_hidden_bid))
        .route("/:auction_id/reveals", post(post_reveal))
        .route("/:auction_id/close_hidden_round", post(post_close_hidden_round))
        .route("/:auction_id/close_open_round", post(post_close_open_round))
        .route("/:auction_id/settle", post(post_settle))
        .route("/:auction_id/token", post(post_retrieve_token))
}

fn to_unix(timestamp: OffsetDateTime) -> i64 {
    timestamp.unix_timestamp()
}

impl From<entities::Phase> for Phase {
    fn from(phase: entities::Phase) -> Self {
        match phase {
            entities::Phase::HiddenBidding => Phase::HiddenBidding,
            entities::Phase::OpenBidding => Phase::OpenBidding,
            entities::Phase::Closed => Phase::Closed,
            entities::Phase::ReadyForDeletion => Phase::ReadyForDeletion,
        }
    }
}

impl From<entities::Winner> for Winner {
    fn from(winner: entities::Winner) -> Self {
        Self {
            account: winner.account,
            bid:     winner.bid,
        }
    }
}

impl From<entities::Token> for Token {
    fn from(token: entities::Token) -> Self {
        Self {
            owner:       token.owner,
            auction_id:  token.auction_id,
            good_amount: token.good_amount,
            created_at:  to_unix(token.created_at),
            valid_until: to_unix(token.valid_until),
        }
    }
}

impl From<entities::Payout> for Transfer {
    fn from(payout: entities::Payout) -> Self {
        Self {
            to:     payout.to,
            amount: payout.amount,
            reason: payout.context.to_string(),
        }
    }
}

impl From<SettlementReport> for Settlement {
    fn from(report: SettlementReport) -> Self {
        Self {
            phase:     report.phase.into(),
            transfers: report.transfers.into_iter().map(Transfer::from).collect(),
            failures:  report
                .failures
                .into_iter()
                .map(|failure| FailedTransfer {
                    to:     failure.payout.to,
                    amount: failure.payout.amount,
                    reason: failure.payout.context.to_string(),
                    error:  failure.error.to_string(),
                })
                .collect(),
        }
    }
}

impl From<entities::Auction> for Auction {
    fn from(auction: entities::Auction) -> Self {
        let token_valid_until = auction.token_valid_until().map(to_unix);
        let refunds_pending = auction.pending_refunds().len();
        Self {
            id: auction.id,
            seller: auction.config.seller,
            good_amount: auction.config.good_amount,
            min_bid: auction.config.min_bid,
            deposit: auction.config.deposit,
            created_at: to_unix(auction.config.created_at),
            hidden_deadline: to_unix(auction.config.hidden_deadline),
            open_deadline: to_unix(auction.config.open_deadline),
            phase: auction.phase.into(),
            bidders: auction.bids.len(),
            winner: auction.winner.map(Winner::from),
            token_valid_until,
            seller_paid: auction.settlement.seller_paid,
            refunds_pending,
        }
    }
}
