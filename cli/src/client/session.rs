//! Single-flight coordination of session refreshes.
//!
//! The coordinator moves between two phases, `Idle` and `Refreshing`. The first
//! caller to [`begin`](RefreshCoordinator::begin) while idle becomes the leader
//! and receives a [`RefreshLease`]; callers arriving while a refresh is in
//! flight receive a [`RefreshWaiter`]. Settling the lease releases every waiter
//! with the same outcome and returns the coordinator to idle. A lease dropped
//! without being settled settles as [`RefreshOutcome::Failed`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

/// Result of a settled refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Refreshing {
        episode: u64,
        waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    },
}

#[derive(Debug, Default)]
struct State {
    phase: Phase,
    episodes: u64,
}

/// Serializes session refreshes so at most one is in flight.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<State>,
}

/// What a caller should do after [`RefreshCoordinator::begin`].
#[derive(Debug)]
pub enum Ticket<'a> {
    /// Perform the refresh and settle the lease.
    Leader(RefreshLease<'a>),
    /// Wait for the in-flight refresh.
    Waiter(RefreshWaiter),
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Joins the current refresh, or starts one if idle.
    pub fn begin(&self) -> Ticket<'_> {
        let mut guard = self.state();
        let state = &mut *guard;
        match &mut state.phase {
            Phase::Idle => {
                state.episodes += 1;
                let episode = state.episodes;
                state.phase = Phase::Refreshing {
                    episode,
                    waiters: Vec::new(),
                };
                Ticket::Leader(RefreshLease {
                    coordinator: self,
                    episode,
                    settled: false,
                })
            }
            Phase::Refreshing { waiters, .. } => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Ticket::Waiter(RefreshWaiter { rx })
            }
        }
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        matches!(self.state().phase, Phase::Refreshing { .. })
    }

    /// Number of callers queued behind the in-flight refresh.
    #[must_use]
    pub fn pending_waiters(&self) -> usize {
        match &self.state().phase {
            Phase::Idle => 0,
            Phase::Refreshing { waiters, .. } => waiters.len(),
        }
    }

    /// Returns to idle, releasing any queued waiters as failed.
    pub fn reset(&self) {
        self.settle(None, RefreshOutcome::Failed);
    }

    /// Settles the in-flight episode; `None` settles whichever is current.
    fn settle(&self, episode: Option<u64>, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.state();
            match &state.phase {
                Phase::Refreshing { episode: current, .. }
                    if episode.map_or(true, |e| e == *current) => {}
                _ => return 0,
            }
            match std::mem::take(&mut state.phase) {
                Phase::Idle => Vec::new(),
                Phase::Refreshing { waiters, .. } => waiters,
            }
        };

        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away has nothing to resume.
            let _ = waiter.send(outcome);
        }
        released
    }
}

/// Held by the caller performing the refresh.
#[derive(Debug)]
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    episode: u64,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Publishes the outcome to all waiters and returns how many were released.
    pub fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(Some(self.episode), outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("Refresh abandoned before settling");
            self.coordinator.settle(Some(self.episode), RefreshOutcome::Failed);
        }
    }
}

/// Held by a caller queued behind an in-flight refresh.
#[derive(Debug)]
pub struct RefreshWaiter {
    rx: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshWaiter {
    /// Waits for the refresh to settle.
    pub async fn wait(self) -> RefreshOutcome {
        self.rx.await.unwrap_or(RefreshOutcome::Failed)
    }
}
