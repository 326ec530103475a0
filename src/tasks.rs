//! Background task pool
//!
//! Network-bound handlers run here so the control loop stays responsive. At most
//! `max_background_tasks` run at once; the rest wait for a permit. Every task is tracked
//! so the process can wait for them or cancel them on exit.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct TaskPool {
    permits: Arc<Semaphore>,
    tasks: Mutex<JoinSet<()>>,
}

impl TaskPool {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `fut`. Must be called from within a Tokio runtime.
    pub fn spawn<F>(&self, label: &'static str, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let mut tasks = self.tasks();

        // Reap finished tasks so the set doesn't grow for the whole session
        while let Some(result) = tasks.try_join_next() {
            log_outcome(result);
        }

        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            debug!("⚙️ Background task '{}' started", label);
            fut.await;
            debug!("⚙️ Background task '{}' finished", label);
        });
    }

    /// Tasks spawned and not yet reaped
    pub fn pending(&self) -> usize {
        self.tasks().len()
    }

    /// Wait until every spawned task, including ones spawned meanwhile, has finished
    pub async fn wait_idle(&self) {
        loop {
            let mut batch = std::mem::take(&mut *self.tasks());
            if batch.is_empty() {
                return;
            }
            while let Some(result) = batch.join_next().await {
                log_outcome(result);
            }
        }
    }

    /// Cancel everything still queued or running
    pub async fn shutdown(&self) {
        self.permits.close();
        let mut batch = std::mem::take(&mut *self.tasks());
        if !batch.is_empty() {
            debug!("🛑 Aborting {} background task(s)", batch.len());
        }
        batch.abort_all();
        while batch.join_next().await.is_some() {}
    }
}

fn log_outcome(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            warn!("⚠️ Background task panicked: {}", e);
        }
    }
}
