//! User directory: the student roster fetched from a remote API.
//!
//! [`QueryCache`] holds the freshness/retry/garbage-collection rules, and the
//! platform clients do the HTTP request off the UI thread. Results are
//! delivered by polling, once per frame.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Endpoint of the student roster.
pub const USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Upper bound of the retry backoff.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// A user record as returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

/// Errors that can occur while fetching the directory.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DirectoryError {
    #[error("HTTP error: status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            DirectoryError::Status(status.as_u16())
        } else if err.is_decode() {
            DirectoryError::Decode(err.to_string())
        } else {
            DirectoryError::Transport(err.to_string())
        }
    }
}

/// Cache tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    /// How long fetched data counts as fresh.
    pub stale_time: Duration,
    /// How long unobserved data is kept.
    pub gc_time: Duration,
    /// Retries after the first failed attempt.
    pub retry: u32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(10 * 60),
            retry: 3,
        }
    }
}

impl QueryOptions {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }
}

/// Delay before retry number `attempt` (0-based): 1s, 2s, 4s, ... capped at 30s.
pub fn retry_delay(attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    Duration::from_secs(1)
        .checked_mul(factor)
        .map_or(MAX_RETRY_DELAY, |d| d.min(MAX_RETRY_DELAY))
}

/// What a view needs to render a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryState<'a, T> {
    pub data: Option<&'a T>,
    pub is_loading: bool,
    pub error: Option<&'a DirectoryError>,
}

/// Single-entry query cache.
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    options: QueryOptions,
    data: Option<T>,
    updated_at: Option<Instant>,
    error: Option<DirectoryError>,
    fetching: bool,
    /// Failed attempts since the last success.
    failures: u32,
    retry_at: Option<Instant>,
    invalidated: bool,
    observers: usize,
    unobserved_since: Option<Instant>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl<T> QueryCache<T> {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            options,
            data: None,
            updated_at: None,
            error: None,
            fetching: false,
            failures: 0,
            retry_at: None,
            invalidated: false,
            observers: 0,
            unobserved_since: None,
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Whether a request should be started now.
    pub fn needs_fetch(&self, now: Instant) -> bool {
        if self.fetching {
            return false;
        }
        if let Some(at) = self.retry_at {
            return now >= at;
        }
        if self.invalidated {
            return true;
        }
        self.data.is_none() && self.error.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Whether the data is older than the stale time (or missing).
    pub fn is_stale(&self, now: Instant) -> bool {
        match self.updated_at {
            Some(at) => now.saturating_duration_since(at) >= self.options.stale_time,
            None => true,
        }
    }

    /// Mark a request as in flight.
    pub fn begin_fetch(&mut self) {
        self.fetching = true;
        self.invalidated = false;
        self.retry_at = None;
    }

    /// Deliver the outcome of a request.
    ///
    /// Failures are retried with exponential backoff; the error only becomes
    /// visible once the retries are used up.
    pub fn resolve(&mut self, result: DirectoryResult<T>, now: Instant) {
        self.fetching = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.updated_at = Some(now);
                self.error = None;
                self.failures = 0;
                self.retry_at = None;
            }
            Err(err) => {
                if self.failures < self.options.retry {
                    let delay = retry_delay(self.failures);
                    self.failures += 1;
                    log::warn!("Query failed ({}), retry {} in {:?}", err, self.failures, delay);
                    self.retry_at = Some(now + delay);
                } else {
                    log::error!("Query failed after {} retries: {}", self.failures, err);
                    self.error = Some(err);
                    self.retry_at = None;
                }
            }
        }
    }

    pub fn state(&self) -> QueryState<'_, T> {
        QueryState {
            data: self.data.as_ref(),
            is_loading: self.data.is_none() && self.error.is_none(),
            error: self.error.as_ref(),
        }
    }

    /// A view started observing the query. Stale data is refetched in the background.
    pub fn subscribe(&mut self, now: Instant) {
        self.observers += 1;
        self.unobserved_since = None;
        if self.data.is_some() && self.is_stale(now) {
            self.invalidated = true;
        }
    }

    /// A view stopped observing the query.
    pub fn unsubscribe(&mut self, now: Instant) {
        self.observers = self.observers.saturating_sub(1);
        if self.observers == 0 {
            self.unobserved_since = Some(now);
        }
    }

    pub fn observers(&self) -> usize {
        self.observers
    }

    /// Drop data nobody looked at for the gc time. Returns true if dropped.
    pub fn collect_garbage(&mut self, now: Instant) -> bool {
        let Some(since) = self.unobserved_since else {
            return false;
        };
        if self.observers > 0 || now.saturating_duration_since(since) < self.options.gc_time {
            return false;
        }
        log::debug!("Dropping unobserved query data");
        self.data = None;
        self.updated_at = None;
        self.error = None;
        self.failures = 0;
        self.retry_at = None;
        self.unobserved_since = None;
        true
    }

    /// Retry after a surfaced error, or refresh on demand.
    pub fn refetch(&mut self) {
        self.error = None;
        self.failures = 0;
        self.retry_at = None;
        self.invalidated = true;
    }
}

/// Event produced by a directory client.
#[derive(Debug, Clone)]
pub enum DirectoryEvent {
    Loaded(DirectoryResult<Vec<User>>),
}

// ============================================================================
// Native client
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native_client {
    use super::*;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
    use std::thread;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Directory client for native platforms.
    ///
    /// Each request runs on its own background thread.
    pub struct NativeDirectoryClient {
        url: String,
        event_tx: Sender<DirectoryEvent>,
        event_rx: Receiver<DirectoryEvent>,
    }

    impl NativeDirectoryClient {
        pub fn new(url: impl Into<String>) -> Self {
            let (event_tx, event_rx) = channel();
            Self {
                url: url.into(),
                event_tx,
                event_rx,
            }
        }

        /// Start fetching the user list.
        pub fn fetch(&self) {
            let url = self.url.clone();
            let tx = self.event_tx.clone();
            thread::spawn(move || {
                log::info!("Fetching users from {}", url);
                let result = fetch_users(&url);
                if let Err(e) = &result {
                    log::warn!("User fetch failed: {}", e);
                }
                let _ = tx.send(DirectoryEvent::Loaded(result));
            });
        }

        /// Poll for finished requests (non-blocking).
        pub fn poll_events(&mut self) -> Vec<DirectoryEvent> {
            let mut events = Vec::new();
            loop {
                match self.event_rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
            events
        }
    }

    fn fetch_users(url: &str) -> DirectoryResult<Vec<User>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }
        let text = response.text()?;
        serde_json::from_str(&text).map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    impl Default for NativeDirectoryClient {
        fn default() -> Self {
            Self::new(USERS_URL)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_client::NativeDirectoryClient;

// ============================================================================
// WASM client
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod wasm_client {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Directory client for WASM.
    ///
    /// Requests run as spawned futures; events must be polled via `poll_events()`.
    pub struct WasmDirectoryClient {
        url: String,
        events: Rc<RefCell<Vec<DirectoryEvent>>>,
    }

    impl WasmDirectoryClient {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                events: Rc::new(RefCell::new(Vec::new())),
            }
        }

        /// Start fetching the user list.
        pub fn fetch(&self) {
            let url = self.url.clone();
            let events = Rc::clone(&self.events);
            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Fetching users from {}", url);
                let result = fetch_users(&url).await;
                if let Err(e) = &result {
                    log::warn!("User fetch failed: {}", e);
                }
                events.borrow_mut().push(DirectoryEvent::Loaded(result));
            });
        }

        /// Poll for finished requests (non-blocking).
        pub fn poll_events(&mut self) -> Vec<DirectoryEvent> {
            std::mem::take(&mut *self.events.borrow_mut())
        }
    }

    async fn fetch_users(url: &str) -> DirectoryResult<Vec<User>> {
        let response = reqwest::get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    impl Default for WasmDirectoryClient {
        fn default() -> Self {
            Self::new(USERS_URL)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_client::WasmDirectoryClient;

/// Platform-specific directory client type.
#[cfg(target_arch = "wasm32")]
pub type DirectoryClient = WasmDirectoryClient;

/// Platform-specific directory client type.
#[cfg(not(target_arch = "wasm32"))]
pub type DirectoryClient = NativeDirectoryClient;

/// Roster query: cache plus client, driven once per frame.
pub struct UserDirectory {
    cache: QueryCache<Vec<User>>,
    client: DirectoryClient,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new(QueryOptions::default(), DirectoryClient::default())
    }
}

impl UserDirectory {
    pub fn new(options: QueryOptions, client: DirectoryClient) -> Self {
        Self {
            cache: QueryCache::new(options),
            client,
        }
    }

    pub fn cache(&self) -> &QueryCache<Vec<User>> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QueryCache<Vec<User>> {
        &mut self.cache
    }

    /// Start due requests and collect finished ones. Returns true if the state changed.
    pub fn update(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for event in self.client.poll_events() {
            let DirectoryEvent::Loaded(result) = event;
            self.cache.resolve(result, now);
            changed = true;
        }
        if self.cache.needs_fetch(now) {
            self.cache.begin_fetch();
            self.client.fetch();
            changed = true;
        }
        changed |= self.cache.collect_garbage(now);
        changed
    }

    /// Time until the next scheduled retry, for scheduling a repaint.
    pub fn next_retry_in(&self, now: Instant) -> Option<Duration> {
        self.cache
            .retry_at
            .map(|at| at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }]"#;

    #[test]
    fn test_user_json() {
        let users: Vec<User> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Leanne Graham");
        assert_eq!(users[0].company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(users[0].address.geo.lng, "81.1496");
    }

    #[test]
    fn test_retry_delay() {
        assert_eq!(retry_delay(0), Duration::from_secs(1));
        assert_eq!(retry_delay(1), Duration::from_secs(2));
        assert_eq!(retry_delay(4), Duration::from_secs(16));
        assert_eq!(retry_delay(5), Duration::from_secs(30));
        assert_eq!(retry_delay(40), Duration::from_secs(30));
    }

    #[test]
    fn test_first_fetch_and_success() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32> = QueryCache::default();
        assert!(cache.needs_fetch(t0));
        assert!(cache.state().is_loading);
        cache.begin_fetch();
        assert!(!cache.needs_fetch(t0));
        cache.resolve(Ok(10), t0);
        assert_eq!(cache.state().data, Some(&10));
        assert!(!cache.state().is_loading);
        assert!(!cache.needs_fetch(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn test_retries_then_surfaces_error() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32> = QueryCache::default();
        let mut now = t0;
        for attempt in 0..3 {
            cache.begin_fetch();
            cache.resolve(Err(DirectoryError::Status(500)), now);
            assert!(cache.state().error.is_none());
            assert!(cache.state().is_loading);
            let delay = retry_delay(attempt);
            assert!(!cache.needs_fetch(now + delay - Duration::from_millis(1)));
            now += delay;
            assert!(cache.needs_fetch(now));
        }
        cache.begin_fetch();
        cache.resolve(Err(DirectoryError::Status(500)), now);
        assert_eq!(cache.state().error, Some(&DirectoryError::Status(500)));
        assert!(!cache.state().is_loading);
        assert!(!cache.needs_fetch(now + Duration::from_secs(3600)));

        cache.refetch();
        assert!(cache.needs_fetch(now));
    }

    #[test]
    fn test_stale_data_refetched_on_subscribe() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32> = QueryCache::default();
        cache.begin_fetch();
        cache.resolve(Ok(1), t0);

        cache.subscribe(t0 + Duration::from_secs(60));
        assert!(!cache.needs_fetch(t0 + Duration::from_secs(60)));
        cache.unsubscribe(t0 + Duration::from_secs(60));

        let later = t0 + Duration::from_secs(6 * 60);
        assert!(cache.is_stale(later));
        cache.subscribe(later);
        assert!(cache.needs_fetch(later));
        // Stale data stays visible while refetching.
        assert_eq!(cache.state().data, Some(&1));
    }

    #[test]
    fn test_fresh_data_is_kept_without_observers() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32> = QueryCache::default();
        cache.begin_fetch();
        cache.resolve(Ok(1), t0);
        assert!(!cache.needs_fetch(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn test_garbage_collection() {
        let t0 = Instant::now();
        let mut cache: QueryCache<u32> = QueryCache::default();
        cache.subscribe(t0);
        cache.begin_fetch();
        cache.resolve(Ok(1), t0);
        assert!(!cache.collect_garbage(t0 + Duration::from_secs(3600)));

        cache.unsubscribe(t0);
        assert!(!cache.collect_garbage(t0 + Duration::from_secs(9 * 60)));
        assert!(cache.collect_garbage(t0 + Duration::from_secs(10 * 60)));
        assert!(cache.state().data.is_none());
        assert!(cache.needs_fetch(t0 + Duration::from_secs(10 * 60)));
    }

    #[test]
    fn test_custom_options() {
        let options = QueryOptions::default().with_retry(0);
        let t0 = Instant::now();
        let mut cache: QueryCache<u32> = QueryCache::new(options);
        cache.begin_fetch();
        cache.resolve(Err(DirectoryError::Transport("offline".into())), t0);
        assert!(cache.state().error.is_some());
    }
}
