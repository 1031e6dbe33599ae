use crate::{
    api_client::AvailabilitySource,
    availability_cache::{cache_key, AvailabilityCache, CACHE_CAPACITY, CACHE_DURATION},
    types::{SearchAvailabilityRequest, SearchAvailabilityResponse, TimeSlot},
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{sync::watch, task::AbortHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);
pub const SERVICE_TYPE: &str = "Financial Health Check";
pub const SERVICE_DURATION: u32 = 60;

pub const SEARCH_FAILED: &str = "Failed to search availability";
pub const NETWORK_ERROR: &str = "Network error occurred. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub slots: Vec<TimeSlot>,
    pub is_loading: bool,
    pub error: String,
}

impl SearchState {
    fn loaded(slots: Vec<TimeSlot>) -> Self {
        Self {
            slots,
            ..Default::default()
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub service_type: String,
    pub duration: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
            cache_capacity: CACHE_CAPACITY,
            cache_ttl: CACHE_DURATION,
            service_type: SERVICE_TYPE.into(),
            duration: SERVICE_DURATION,
        }
    }
}

struct PendingLookup {
    generation: u64,
    handle: AbortHandle,
}

struct Shared {
    cache: AvailabilityCache,
    pending: Option<PendingLookup>,
    // Bumped by every search that reaches the cache; only a lookup carrying
    // the current value may publish state.
    generation: u64,
}

pub struct SearchController<S: AvailabilitySource> {
    source: S,
    settings: SearchSettings,
    shared: Arc<Mutex<Shared>>,
    state: Arc<watch::Sender<SearchState>>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: AvailabilitySource> SearchController<S> {
    pub fn new(source: S) -> Self {
        Self::with_settings(source, SearchSettings::default())
    }

    pub fn with_settings(source: S, settings: SearchSettings) -> Self {
        let (sender, _) = watch::channel(SearchState::default());
        Self {
            source,
            shared: Arc::new(Mutex::new(Shared {
                cache: AvailabilityCache::new(settings.cache_capacity, settings.cache_ttl),
                pending: None,
                generation: 0,
            })),
            settings,
            state: Arc::new(sender),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> WatchStream<SearchState> {
        WatchStream::new(self.state.subscribe())
    }

    pub fn search(&self, date: &str, time: &str) {
        if date.is_empty() || time.is_empty() {
            return;
        }

        let key = cache_key(date, time);
        let mut shared = lock(&self.shared);
        shared.generation += 1;

        if let Some(slots) = shared.cache.get(&key) {
            debug!(%key, "Availability served from cache");
            self.state.send_replace(SearchState::loaded(slots));
            return;
        }

        if let Some(pending) = shared.pending.take() {
            debug!(generation = pending.generation, "Pending lookup cancelled");
            pending.handle.abort();
        }

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error.clear();
        });

        let request = SearchAvailabilityRequest {
            date: date.to_string(),
            time: time.to_string(),
            service_type: self.settings.service_type.clone(),
            duration: self.settings.duration,
            branch_id: None,
        };
        let lookup = Lookup {
            source: self.source.clone(),
            shared: self.shared.clone(),
            state: self.state.clone(),
            generation: shared.generation,
            key,
            request,
        };
        let task = tokio::spawn(lookup.run(self.settings.debounce));

        shared.pending = Some(PendingLookup {
            generation: shared.generation,
            handle: task.abort_handle(),
        });
    }

    pub fn clear_results(&self) {
        self.state.send_replace(SearchState::default());
    }

    // Lookups already sent to the server are left to finish.
    pub fn cleanup(&self) {
        if let Some(pending) = lock(&self.shared).pending.take() {
            debug!(generation = pending.generation, "Pending lookup cancelled on cleanup");
            pending.handle.abort();
        }
    }
}

impl<S: AvailabilitySource> Drop for SearchController<S> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

struct Lookup<S> {
    source: S,
    shared: Arc<Mutex<Shared>>,
    state: Arc<watch::Sender<SearchState>>,
    generation: u64,
    key: String,
    request: SearchAvailabilityRequest,
}

impl<S: AvailabilitySource> Lookup<S> {
    async fn run(self, debounce: Duration) {
        tokio::time::sleep(debounce).await;

        // Firing means leaving the pending slot; a lookup no longer in it was cancelled.
        {
            let mut shared = lock(&self.shared);
            let fired = shared
                .pending
                .as_ref()
                .is_some_and(|pending| pending.generation == self.generation);
            if !fired {
                return;
            }
            shared.pending = None;
        }

        debug!(key = %self.key, "Searching availability");
        let result = self.source.search_availability(self.request).await;

        let mut shared = lock(&self.shared);
        let next_state = match result {
            Ok(SearchAvailabilityResponse {
                success: true,
                data: Some(data),
                ..
            }) => {
                shared.cache.insert(self.key, data.slots.clone());
                SearchState::loaded(data.slots)
            }
            Ok(response) => {
                let message = response
                    .error
                    .map(|error| error.message)
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| SEARCH_FAILED.into());
                warn!(%message, "Availability search unsuccessful");
                SearchState::failed(message)
            }
            Err(err) => {
                warn!(%err, "Availability search failed");
                SearchState::failed(NETWORK_ERROR)
            }
        };

        if shared.generation != self.generation {
            debug!(generation = self.generation, "Stale availability response ignored");
            return;
        }
        self.state.send_replace(next_state);
    }
}
