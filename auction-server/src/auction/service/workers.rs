use {
    super::{
        close_hidden_round::CloseHiddenRoundInput,
        close_open_round::CloseOpenRoundInput,
        Service,
    },
    crate::{
        auction::entities,
        server::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
    },
    anyhow::Result,
    std::{
        sync::atomic::Ordering,
        time::Duration,
    },
    tokio::task::JoinHandle,
};

impl Service {
    pub async fn run_deadline_loop(&self, check_interval: Duration) -> Result<()> {
        tracing::info!(
            check_interval = ?check_interval,
            "Starting deadline watcher..."
        );
        let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
        let mut deadline_check_interval = tokio::time::interval(check_interval);
        let mut running = None;
        while !SHOULD_EXIT.load(Ordering::Acquire) {
            tokio::select! {
                _ = deadline_check_interval.tick() => {
                    self.start_deadline_check(&mut running);
                }
                _ = exit_check_interval.tick() => {}
            }
        }
        tracing::info!("Shutting down deadline watcher...");
        Ok(())
    }

    /// Spawns a `close_due_rounds` run unless the previous one is still active.
    fn start_deadline_check(&self, running: &mut Option<JoinHandle<usize>>) -> bool {
        if running.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("Previous deadline check still running, skipping tick");
            return false;
        }
        *running = Some(self.task_tracker.spawn({
            let service = self.clone();
            async move { service.close_due_rounds().await }
        }));
        true
    }

    /// Closes every round whose deadline has strictly passed. Returns how many rounds were closed.
    pub async fn close_due_rounds(&self) -> usize {
        let now = self.clock.now();
        let mut closed = 0;
        for (auction_id, lock) in self.repo.get_in_memory_auction_locks().await {
            let due = {
                let auction = lock.lock().await;
                if auction.released {
                    None
                } else {
                    match auction.phase {
                        entities::Phase::HiddenBidding => (now > auction.config.hidden_deadline)
                            .then_some(entities::Round::Hidden),
                        entities::Phase::OpenBidding => {
                            (now > auction.config.open_deadline).then_some(entities::Round::Open)
                        }
                        entities::Phase::Closed | entities::Phase::ReadyForDeletion => None,
                    }
                }
            };

            let result = match due {
                Some(entities::Round::Hidden) => self
                    .close_hidden_round(CloseHiddenRoundInput { auction_id })
                    .await
                    .map(|_| ()),
                Some(entities::Round::Open) => self
                    .close_open_round(CloseOpenRoundInput { auction_id })
                    .await
                    .map(|report| {
                        if !report.is_complete() {
                            tracing::warn!(
                                auction_id = %auction_id,
                                failures = report.failures.len(),
                                "Settlement left payouts unpaid"
                            );
                        }
                    }),
                None => continue,
            };
            match result {
                Ok(()) => closed += 1,
                Err(err) => tracing::error!(
                    auction_id = %auction_id,
                    error = %err,
                    "Failed to close round"
                ),
            }
        }
        closed
    }
}
