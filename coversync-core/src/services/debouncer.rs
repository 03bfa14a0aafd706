use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time;

use crate::services::timer::TimerHandle;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Default)]
struct Pending {
    generation: u64,
    timer: Option<TimerHandle>,
}

/// Cancel-and-replace delay: only the last job scheduled within the window runs.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Arc<Mutex<Pending>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedules `job` after the quiet window, dropping whatever was pending.
    pub fn schedule<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = lock(&self.pending);
        pending.generation += 1;

        let generation = pending.generation;
        let slot = Arc::clone(&self.pending);
        let window = self.window;

        let timer = TimerHandle::spawn(async move {
            time::sleep(window).await;

            {
                let mut pending = lock(&slot);
                if pending.generation != generation {
                    return;
                }
                if let Some(own) = pending.timer.take() {
                    own.release();
                }
            }

            job.await;
        });

        if let Some(previous) = pending.timer.replace(timer) {
            previous.cancel();
        }
    }

    /// Drops the pending job, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut pending = lock(&self.pending);
        pending.generation += 1;

        match pending.timer.take() {
            Some(timer) => {
                timer.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).timer.is_some()
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}
