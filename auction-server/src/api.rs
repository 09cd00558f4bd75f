use {
    crate::{
        auction::{
            self,
            entities::AuctionError,
        },
        config::RunOptions,
        kernel::entities::{
            AccountId,
            LedgerAccount,
        },
        server::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
        state::Store,
    },
    anyhow::Result,
    axum::{
        extract::{
            Path,
            State,
        },
        http::StatusCode,
        response::{
            IntoResponse,
            Response,
        },
        routing::get,
        Json,
        Router,
    },
    clap::crate_version,
    sealed_auction_api_types::{
        account::Balance,
        ErrorBodyResponse,
        Route,
    },
    std::sync::{
        atomic::Ordering,
        Arc,
    },
    tower_http::cors::CorsLayer,
};

async fn root() -> String {
    format!("Sealed Auction Server API {}", crate_version!())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestError {
    /// The request contained invalid parameters
    BadParameters(String),
    /// The auction was not found
    AuctionNotFound,
    /// The caller is not allowed to perform the operation
    Unauthorized,
    /// The operation is not possible in the current state of the auction
    Conflict(String),
    /// The ledger rejected a transfer, the operation can be retried
    TransferFailed(String),
}

impl RestError {
    pub fn to_status_and_message(&self) -> (StatusCode, String) {
        match self {
            RestError::BadParameters(msg) => {
                (StatusCode::BAD_REQUEST, format!("Bad parameters: {}", msg))
            }
            RestError::AuctionNotFound => (
                StatusCode::NOT_FOUND,
                "Auction with the specified id was not found".to_string(),
            ),
            RestError::Unauthorized => (
                StatusCode::FORBIDDEN,
                "Caller is not allowed to perform this operation".to_string(),
            ),
            RestError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            RestError::TransferFailed(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Transfer failed: {}", msg),
            ),
        }
    }
}

impl From<AuctionError> for RestError {
    fn from(error: AuctionError) -> Self {
        match error {
            AuctionError::AuctionNotFound => RestError::AuctionNotFound,
            AuctionError::Unauthorized | AuctionError::NotWinner => RestError::Unauthorized,
            AuctionError::TransferFailed(err) => RestError::TransferFailed(err.to_string()),
            AuctionError::InvalidParameters(_)
            | AuctionError::InsufficientDeposit { .. }
            | AuctionError::BidTooLow { .. }
            | AuctionError::CommitmentMismatch
            | AuctionError::NoHiddenBid => RestError::BadParameters(error.to_string()),
            AuctionError::InvalidState { .. }
            | AuctionError::DeadlinePassed { .. }
            | AuctionError::DeadlineNotYetReached { .. }
            | AuctionError::AlreadyRevealed
            | AuctionError::NoWinnerCandidate
            | AuctionError::NotDeletable => RestError::Conflict(error.to_string()),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, msg) = self.to_status_and_message();
        (status, Json(ErrorBodyResponse { error: msg })).into_response()
    }
}

pub async fn live() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// Balance of a participant account on the ledger.
pub async fn get_balance(
    State(store): State<Arc<Store>>,
    Path(account): Path<AccountId>,
) -> Result<Json<Balance>, RestError> {
    if account.is_empty() {
        return Err(RestError::BadParameters("Account must not be empty".to_string()));
    }
    let amount = store
        .ledger()
        .balance_of(&LedgerAccount::Participant(account.clone()))
        .await;
    Ok(Json(Balance { account, amount }))
}

pub fn get_routes() -> Router<Arc<Store>> {
    let account_routes = Router::new().route("/:account/balance", get(get_balance));

    Router::new().nest(
        Route::V1.as_ref(),
        Router::new()
            .nest(Route::Auction.as_ref(), auction::api::get_routes())
            .nest(Route::Account.as_ref(), account_routes),
    )
}

pub async fn start_api(run_options: RunOptions, store: Arc<Store>) -> Result<()> {
    let app: Router<()> = Router::new()
        .merge(get_routes())
        .route(Route::Root.as_ref(), get(root))
        .route(Route::Liveness.as_ref(), get(live))
        .layer(CorsLayer::permissive())
        .with_state(store);

    let listener = tokio::net::TcpListener::bind(&run_options.server.listen_addr).await?;
    tracing::info!(listen_addr = %run_options.server.listen_addr, "Starting RPC server...");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            while !SHOULD_EXIT.load(Ordering::Acquire) {
                tokio::time::sleep(EXIT_CHECK_INTERVAL).await;
            }
            tracing::info!("Shutting down RPC server...");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::kernel::ledger::TransferError,
        time::OffsetDateTime,
    };

    #[test]
    fn test_error_status_codes() {
        let status = |error: AuctionError| RestError::from(error).to_status_and_message().0;
        assert_eq!(status(AuctionError::AuctionNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(AuctionError::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status(AuctionError::NotWinner), StatusCode::FORBIDDEN);
        assert_eq!(
            status(AuctionError::CommitmentMismatch),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AuctionError::DeadlinePassed {
                deadline: OffsetDateTime::UNIX_EPOCH,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(AuctionError::NotDeletable), StatusCode::CONFLICT);
        assert_eq!(
            status(AuctionError::TransferFailed(TransferError::Unavailable(
                "offline".to_string()
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
