//! Debounced student lookup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use capstone_api::UserService;
use capstone_domain::UserSummary;

/// Quiet period before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Runs a job once input has been quiet for `delay`.
///
/// Each call to [`Debouncer::schedule`] aborts the pending timer and starts a
/// new one. Once the timer fires, the job runs on its own task and is no
/// longer cancelled by later input.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(job);
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// What the search box currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<UserSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Student search box: keystrokes in, debounced `/users/search` calls out.
pub struct StudentSearch {
    users: UserService,
    debouncer: Debouncer,
    state: Arc<RwLock<SearchState>>,
}

impl StudentSearch {
    pub fn new(users: UserService) -> Self {
        Self::with_delay(users, SEARCH_DEBOUNCE)
    }

    pub fn with_delay(users: UserService, delay: Duration) -> Self {
        Self {
            users,
            debouncer: Debouncer::new(delay),
            state: Arc::new(RwLock::new(SearchState::default())),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.read().clone()
    }

    /// Feed the current text of the search box.
    pub fn input(&self, text: &str) {
        let query = text.trim().to_string();
        {
            let mut state = self.state.write();
            state.query = query.clone();
            if query.is_empty() {
                state.results.clear();
                state.loading = false;
                state.error = None;
            }
        }

        if query.is_empty() {
            self.debouncer.cancel();
            return;
        }

        let users = self.users.clone();
        let state = self.state.clone();
        self.debouncer.schedule(async move {
            state.write().loading = true;
            debug!("Searching students for {:?}", query);
            let outcome = users.search(&query).await;

            let mut state = state.write();
            // A newer query owns the box now.
            if state.query != query {
                return;
            }
            state.loading = false;
            match outcome {
                Ok(results) => {
                    state.results = results;
                    state.error = None;
                }
                Err(e) => {
                    warn!("Student search failed: {}", e);
                    state.results.clear();
                    state.error = Some(e.user_message());
                }
            }
        });
    }
}
