//! # Background Enrichment Fetcher
//!
//! Schedules at most one GATT identity read per device per process run.
//!
//! ```text
//! Unattempted ──schedule()──► Attempting ──► Succeeded
//!                                   └──────► Failed   (terminal until restart)
//! ```
//!
//! The Unattempted → Attempting transition happens synchronously under one
//! lock, so concurrent Info packets for the same device cannot trigger two
//! connections. Devices already present in the [`EnrichmentStore`] are never
//! scheduled. The read itself runs as a spawned tokio task bounded by a
//! timeout, and the connection is closed even when the timeout fires; the
//! decode path never waits for it.

use crate::ble::DeviceAddress;
use crate::cache::EnrichmentStore;
use crate::enrichment::client::{read_with_session, GattClient};
use crate::error::OtodataError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Per-device enrichment state for the current process run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentState {
    Unattempted,
    Attempting,
    Succeeded,
    Failed,
}

type StateMap = HashMap<String, EnrichmentState>;

pub struct EnrichmentFetcher {
    client: Arc<dyn GattClient>,
    store: Arc<EnrichmentStore>,
    states: Arc<Mutex<StateMap>>,
    timeout: Duration,
    runtime: Option<Handle>,
}

impl std::fmt::Debug for EnrichmentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentFetcher")
            .field("timeout", &self.timeout)
            .field("has_runtime", &self.runtime.is_some())
            .field("attempted", &lock_states(&self.states).len())
            .finish()
    }
}

fn lock_states(states: &Mutex<StateMap>) -> MutexGuard<'_, StateMap> {
    states.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EnrichmentFetcher {
    /// Create a fetcher that spawns onto the current tokio runtime, if any.
    ///
    /// Without a runtime every scheduled attempt fails immediately; use
    /// [`EnrichmentFetcher::with_runtime`] when constructing outside one.
    pub fn new(
        client: Arc<dyn GattClient>,
        store: Arc<EnrichmentStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            store,
            states: Arc::new(Mutex::new(StateMap::new())),
            timeout,
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn state(&self, address: &DeviceAddress) -> EnrichmentState {
        lock_states(&self.states)
            .get(&address.normalized())
            .copied()
            .unwrap_or(EnrichmentState::Unattempted)
    }

    /// Normalized addresses scheduled during this run
    pub fn attempted(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock_states(&self.states).keys().cloned().collect();
        keys.sort();
        keys
    }

    fn begin_attempt(&self, key: &str) -> bool {
        let mut states = lock_states(&self.states);
        if states.contains_key(key) || self.store.contains_key(key) {
            return false;
        }
        states.insert(key.to_string(), EnrichmentState::Attempting);
        true
    }

    /// Schedule a background identity read for `address`.
    ///
    /// Returns `None` when the device was already attempted this run, is
    /// already in the store, or no runtime is available. The returned handle
    /// may be dropped; the task keeps running.
    pub fn schedule(&self, address: DeviceAddress) -> Option<JoinHandle<EnrichmentState>> {
        let key = address.normalized();
        if !self.begin_attempt(&key) {
            return None;
        }

        let Some(runtime) = &self.runtime else {
            warn!("No async runtime available; skipping enrichment for {address}");
            lock_states(&self.states).insert(key, EnrichmentState::Failed);
            return None;
        };

        debug!("Scheduling enrichment read for {address}");
        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        let states = Arc::clone(&self.states);
        let timeout = self.timeout;

        Some(runtime.spawn(async move {
            let state = match fetch(client, store, address, timeout).await {
                Ok(()) => EnrichmentState::Succeeded,
                Err(e) => {
                    warn!("Enrichment for {address} failed: {e}");
                    EnrichmentState::Failed
                }
            };
            lock_states(&states).insert(key, state);
            state
        }))
    }
}

async fn fetch(
    client: Arc<dyn GattClient>,
    store: Arc<EnrichmentStore>,
    address: DeviceAddress,
    timeout: Duration,
) -> Result<(), OtodataError> {
    let report = read_with_session(client.as_ref(), &address, timeout).await?;

    if report.record.is_empty() {
        return Err(OtodataError::EnrichmentUnavailable(format!(
            "no characteristic could be read ({} failures)",
            report.failures.len()
        )));
    }

    let record = report.record;
    tokio::task::spawn_blocking(move || store.merge(&address, &record))
        .await
        .map_err(|e| OtodataError::EnrichmentUnavailable(format!("store task failed: {e}")))??;

    info!("Enriched {address} ({} field(s) unavailable)", report.failures.len());
    Ok(())
}
