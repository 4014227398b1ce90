//! Application Store
//!
//! Single owner of everything fetched from the backend. Views read
//! snapshots (or subscribe to them) and call the action methods; they never
//! mutate state directly.
//!
//! ## Actions
//!
//! - **refresh**: fetch customers, partners and loans concurrently and swap
//!   all three in at once, or nothing if any fetch fails
//! - **create_entity**: post one record, then refresh on success
//!
//! Overlapping actions are allowed. Each refresh takes a sequence number and
//! its results are dropped if a later refresh has already been applied.

mod state;

pub use state::{AppState, Banner, BannerKind};

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::api::{self, ApiResult, Backend};
use crate::forms::Submission;
use crate::models::{Customer, EntityKind, Loan, Partner};

/// Banner text after a successful create
pub const SAVED_MESSAGE: &str = "Saved successfully";

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long the success banner stays up
    pub success_message_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            success_message_ttl: Duration::from_millis(2000),
        }
    }
}

struct Inner {
    backend: Arc<dyn Backend>,
    state: watch::Sender<AppState>,
    refresh_seq: AtomicU64,
    config: StoreConfig,
}

/// Cheaply cloneable handle to the application state
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<Inner>,
}

impl AppStore {
    /// Create a store with empty collections. Nothing is fetched yet.
    pub fn new(backend: Arc<dyn Backend>, config: StoreConfig) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                state,
                refresh_seq: AtomicU64::new(0),
                config,
            }),
        }
    }

    /// Create a store and kick off the initial refresh in the background
    pub fn start(backend: Arc<dyn Backend>, config: StoreConfig) -> Self {
        let store = Self::new(backend, config);
        let initial = store.clone();
        tokio::spawn(async move {
            // failures already land in the banner
            let _ = initial.refresh().await;
        });
        store
    }

    /// Current state
    pub fn snapshot(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    /// Re-fetch all three collections
    ///
    /// On failure the previous collections stay in place and the error text
    /// becomes the banner.
    pub async fn refresh(&self) -> ApiResult<()> {
        let _loading = LoadingGuard::begin(&self.inner);

        let result = self.fetch_all().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Refresh failed");
            self.set_message(Banner::error(e.to_string()));
        }
        result
    }

    /// Post one record and refresh everything once the backend accepts it
    ///
    /// The success banner clears itself after the configured TTL. Error
    /// banners stay until replaced.
    pub async fn create_entity(&self, kind: EntityKind, payload: Value) -> ApiResult<()> {
        let _loading = LoadingGuard::begin(&self.inner);
        self.clear_message();

        tracing::info!(entity = kind.name(), "Creating record");
        if let Err(e) = api::create(self.inner.backend.as_ref(), kind.path(), &payload).await {
            tracing::warn!(entity = kind.name(), error = %e, "Create failed");
            self.set_message(Banner::error(format!("Error: {}", e)));
            return Err(e);
        }

        if let Err(e) = self.fetch_all().await {
            tracing::warn!(error = %e, "Refresh after create failed");
            self.set_message(Banner::error(e.to_string()));
            return Err(e);
        }

        let id = self.set_message(Banner::success(SAVED_MESSAGE));
        self.expire_message(id, self.inner.config.success_message_ttl);
        Ok(())
    }

    /// Forward a form submission to [`AppStore::create_entity`]
    pub async fn submit(&self, submission: Submission) -> ApiResult<()> {
        self.create_entity(submission.kind, submission.payload).await
    }

    async fn fetch_all(&self) -> ApiResult<()> {
        let seq = self.inner.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let backend = self.inner.backend.as_ref();

        let (customers, partners, loans) = tokio::try_join!(
            api::fetch_collection::<Customer>(backend, EntityKind::Customer.path()),
            api::fetch_collection::<Partner>(backend, EntityKind::Partner.path()),
            api::fetch_collection::<Loan>(backend, EntityKind::Loan.path()),
        )?;

        let counts = (customers.len(), partners.len(), loans.len());
        let applied = self.inner.state.send_if_modified(|state| {
            if seq <= state.applied_refresh {
                return false;
            }
            state.customers = customers;
            state.partners = partners;
            state.loans = loans;
            state.applied_refresh = seq;
            true
        });

        if applied {
            tracing::debug!(
                seq,
                customers = counts.0,
                partners = counts.1,
                loans = counts.2,
                "Collections refreshed"
            );
        } else {
            tracing::debug!(seq, "Discarded stale refresh result");
        }
        Ok(())
    }

    fn set_message(&self, banner: Banner) -> u64 {
        let mut id = 0;
        self.inner.state.send_modify(|state| {
            state.message_seq += 1;
            state.message = Some(banner);
            id = state.message_seq;
        });
        id
    }

    fn clear_message(&self) {
        self.inner.state.send_modify(|state| {
            state.message_seq += 1;
            state.message = None;
        });
    }

    /// Clear the message after `ttl`, unless something replaced it meanwhile
    fn expire_message(&self, id: u64, ttl: Duration) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            inner.state.send_if_modified(|state| {
                if state.message_seq != id {
                    return false;
                }
                state.message = None;
                true
            });
        });
    }
}

/// Keeps the loading flag raised while an action is in flight
struct LoadingGuard {
    inner: Arc<Inner>,
}

impl LoadingGuard {
    fn begin(inner: &Arc<Inner>) -> Self {
        inner.state.send_modify(|state| state.pending += 1);
        Self {
            inner: Arc::clone(inner),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner
            .state
            .send_modify(|state| state.pending = state.pending.saturating_sub(1));
    }
}
