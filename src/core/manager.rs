//! Owns the rate table and its refresh lifecycle.
//!
//! The manager is the only writer of the table. Readers get cloned
//! snapshots, so a conversion never waits on a refresh in progress and keeps
//! serving the last good rates while one is outstanding or after one fails.

use crate::core::convert::{self, ConversionRequest, ConversionResult};
use crate::core::currency::{BASE_CURRENCY, RateProvider};
use crate::core::error::RefreshError;
use crate::core::rates::RateTable;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshStatus {
    Idle,
    Loading,
    Ready,
    Error(RefreshError),
}

/// What happened to one call of [`RateTableManager::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied { updated_at: DateTime<Utc> },
    Failed(RefreshError),
    /// A newer refresh was issued while this one was in flight, so its
    /// response was dropped.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub table: RateTable,
    pub status: RefreshStatus,
    pub last_updated_at: Option<DateTime<Utc>>,
}

pub struct RateTableManager {
    provider: Arc<dyn RateProvider>,
    state: RwLock<RateSnapshot>,
    issued: AtomicU64,
    started: AtomicBool,
}

impl RateTableManager {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(RateSnapshot {
                table: RateTable::new(BASE_CURRENCY),
                status: RefreshStatus::Idle,
                last_updated_at: None,
            }),
            issued: AtomicU64::new(0),
            started: AtomicBool::new(false),
        }
    }

    /// Starts the automatic refresh. Only the first call does anything; the
    /// status is `Loading` by the time this returns.
    pub fn begin(self: &Arc<Self>) -> Option<JoinHandle<RefreshOutcome>> {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Rate refresh lifecycle already started");
            return None;
        }

        Some(self.spawn_refresh())
    }

    /// Marks the table `Loading` and takes a ticket before handing the fetch
    /// to a task, so observers see the new status as soon as this returns.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let ticket = self.start_refresh();
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.fetch_and_apply(ticket).await })
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.start_refresh();
        self.fetch_and_apply(ticket).await
    }

    fn start_refresh(&self) -> u64 {
        self.write_state(|state| state.status = RefreshStatus::Loading);
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[instrument(name = "RateRefresh", skip(self))]
    async fn fetch_and_apply(&self, ticket: u64) -> RefreshOutcome {
        debug!(ticket, "Requesting rates for base {}", BASE_CURRENCY);

        let fetched = self.provider.fetch_rates(BASE_CURRENCY).await;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Checked under the write lock so a newer response cannot land in between.
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket != latest {
            debug!(ticket, latest, "Discarding superseded refresh response");
            return RefreshOutcome::Superseded;
        }

        match fetched {
            Ok(rates) => {
                let updated_at = Utc::now();
                state.table = RateTable::from_provider(BASE_CURRENCY, rates);
                state.status = RefreshStatus::Ready;
                state.last_updated_at = Some(updated_at);
                info!(count = state.table.len(), "Exchange rates updated");
                RefreshOutcome::Applied { updated_at }
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh exchange rates");
                state.status = RefreshStatus::Error(e.clone());
                RefreshOutcome::Failed(e)
            }
        }
    }

    pub fn snapshot(&self) -> RateSnapshot {
        self.read_state(Clone::clone)
    }

    pub fn table(&self) -> RateTable {
        self.read_state(|state| state.table.clone())
    }

    pub fn status(&self) -> RefreshStatus {
        self.read_state(|state| state.status.clone())
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.read_state(|state| state.last_updated_at)
    }

    /// Converts against the current table, stale or not.
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        self.read_state(|state| convert::convert(&state.table, request))
    }

    fn read_state<T>(&self, f: impl FnOnce(&RateSnapshot) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write_state(&self, f: impl FnOnce(&mut RateSnapshot)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}
