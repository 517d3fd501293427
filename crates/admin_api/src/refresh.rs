//! Single-flight coordination for access-token refresh.
//!
//! When several requests see a rejected access token at about the same time,
//! only the first one to reach [`RefreshCoordinator::acquire`] becomes the
//! leader and calls the refresh endpoint. Everyone else is parked on a oneshot
//! channel and receives the leader's outcome when it settles.
//!
//! Invariant: the in-flight check and the decision to lead or to wait happen
//! under one lock with no suspension point in between, so two callers can
//! never both observe "idle" and both start a refresh, on any runtime flavor.

use std::future::Future;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;

/// Outcome delivered to waiters when the refresh does not produce a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// The refresh call failed; carries a human-readable reason.
    Rejected(String),
    /// The leader was dropped before it settled.
    Abandoned,
}

type RefreshOutcome = Result<String, RefreshFailure>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Per-client refresh barrier. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    started: AtomicU64,
}

/// Role handed out by [`RefreshCoordinator::acquire`].
pub enum RefreshTicket<'a> {
    /// Caller must perform the refresh and settle the guard.
    Leader(LeaderGuard<'a>),
    /// Caller waits for the leader's outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically either claim the refresh or join the waiter queue.
    pub fn acquire(&self) -> RefreshTicket<'_> {
        let mut state = lock_unpoisoned(&self.state);
        if state.in_flight {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push(sender);
            return RefreshTicket::Follower(receiver);
        }

        state.in_flight = true;
        self.started.fetch_add(1, Ordering::AcqRel);
        RefreshTicket::Leader(LeaderGuard {
            coordinator: self,
            settled: false,
        })
    }

    /// Run `refresh` if no refresh is in flight, otherwise wait for the one
    /// that is. Either way every caller of the same wave sees the same outcome.
    ///
    /// `refresh` is only invoked for the leader.
    pub async fn acquire_or_wait<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        match self.acquire() {
            RefreshTicket::Follower(receiver) => receiver
                .await
                .unwrap_or(Err(RefreshFailure::Abandoned)),
            RefreshTicket::Leader(guard) => {
                let outcome = refresh().await;
                guard.settle(outcome.clone());
                outcome
            }
        }
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        lock_unpoisoned(&self.state).in_flight
    }

    /// Requests currently parked behind the in-flight refresh.
    #[must_use]
    pub fn waiting(&self) -> usize {
        lock_unpoisoned(&self.state).waiters.len()
    }

    /// Number of refreshes this coordinator has started.
    #[must_use]
    pub fn refreshes_started(&self) -> u64 {
        self.started.load(Ordering::Acquire)
    }

    fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = lock_unpoisoned(&self.state);
            state.in_flight = false;
            mem::take(&mut state.waiters)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose caller was dropped has nobody left to notify.
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

/// Held by the leader for the duration of the refresh.
///
/// Dropping it unsettled (the leader's future was cancelled) rejects every
/// waiter with [`RefreshFailure::Abandoned`] and reopens the barrier.
pub struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    /// Resolve or reject every waiter and reset the in-flight flag.
    /// Returns how many waiters were released.
    pub fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(Err(RefreshFailure::Abandoned));
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
