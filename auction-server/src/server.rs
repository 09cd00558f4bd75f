use {
    crate::{
        api,
        auction::service::{
            self,
            Service,
        },
        config::{
            Config,
            RunOptions,
        },
        kernel::{
            clock::SystemClock,
            entities::LedgerAccount,
            ledger::InMemoryLedger,
        },
        state::Store,
    },
    anyhow::anyhow,
    futures::future::join_all,
    std::{
        future::Future,
        sync::{
            atomic::{
                AtomicBool,
                Ordering,
            },
            Arc,
        },
        time::Duration,
    },
    tokio::sync::broadcast,
    tokio_util::task::TaskTracker,
};

/// A loop that stops for any reason takes the others down with it.
async fn exit_on_completion(
    task: impl Future<Output = anyhow::Result<()>>,
) -> anyhow::Result<()> {
    let result = task.await;
    SHOULD_EXIT.store(true, Ordering::Release);
    result
}

pub async fn start_server(run_options: RunOptions) -> anyhow::Result<()> {
    tokio::spawn(async move {
        tracing::info!("Registered shutdown signal handler...");
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "Failed to listen for the shutdown signal");
        }
        tracing::info!("Shut down signal received, waiting for tasks...");
        SHOULD_EXIT.store(true, Ordering::Release);
    });

    let config = Config::load(&run_options.config.config).map_err(|err| {
        anyhow!(
            "Failed to load config from file({path}): {:?}",
            err,
            path = run_options.config.config
        )
    })?;

    let ledger = Arc::new(InMemoryLedger::new(
        config
            .ledger
            .initial_balances
            .iter()
            .map(|(account, amount)| (LedgerAccount::Participant(account.clone()), *amount)),
    ));
    tracing::info!(
        accounts = config.ledger.initial_balances.len(),
        total_supply = ledger.total_supply().await,
        "Ledger initialized"
    );

    let (event_sender, _) = broadcast::channel(config.event_channel_size);
    let task_tracker = TaskTracker::new();
    let auction_service = Service::new(
        service::Config {
            admin:  config.admin.clone(),
            timing: config.auction.timing()?,
        },
        ledger,
        Arc::new(SystemClock),
        event_sender,
        task_tracker.clone(),
    );
    let store = Arc::new(Store {
        auction_service: auction_service.clone(),
    });

    let deadline_loop = tokio::spawn(exit_on_completion({
        let service = auction_service.clone();
        let interval = config.deadline_check_interval;
        async move { service.run_deadline_loop(interval).await }
    }));
    let server_loop = tokio::spawn(exit_on_completion(api::start_api(run_options, store)));
    for result in join_all(vec![deadline_loop, server_loop]).await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(error = ?err, "Task returned an error"),
            Err(err) => tracing::error!(error = ?err, "Task panicked or was cancelled"),
        }
    }

    task_tracker.close();
    task_tracker.wait().await;
    Ok(())
}

// Set once on shutdown. Every loop polls it at EXIT_CHECK_INTERVAL and returns when it flips.
pub(crate) static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);
pub const EXIT_CHECK_INTERVAL: Duration = Duration::from_secs(1);
