//! Session Store
//!
//! Per-session storage for the redirect flow: the page the user came from
//! and the `state` values issued with authorization URLs.

use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long an issued `state` stays pending by default (10 minutes).
pub const DEFAULT_STATE_MAX_AGE: Duration = Duration::from_secs(600);

/// Host-supplied session storage, keyed by the host's session identifier.
pub trait SessionStore: Send + Sync {
    /// Remember the URL to return the user to after authorization.
    fn save_client_url(&self, session: &str, url: &str);

    /// The remembered client URL, if any.
    fn client_url(&self, session: &str) -> Option<String>;

    /// Remember a `state` issued for this session.
    fn save_state(&self, session: &str, state: &str);

    /// Remove `state` from the session; `true` if it was pending and not expired.
    fn consume_state(&self, session: &str, state: &str) -> bool;

    /// Drop expired states and sessions with nothing left in them.
    fn clear_expired(&self);
}

struct PendingState {
    value: String,
    issued_at: Instant,
}

struct SessionData {
    client_url: Option<String>,
    states: Vec<PendingState>,
    touched_at: Instant,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            client_url: None,
            states: Vec::new(),
            touched_at: Instant::now(),
        }
    }
}

impl SessionData {
    fn prune(&mut self, max_age: Duration) {
        self.states.retain(|s| s.issued_at.elapsed() < max_age);
    }

    fn is_stale(&self, max_age: Duration) -> bool {
        self.states.is_empty() && self.touched_at.elapsed() >= max_age
    }
}

/// In-memory session store.
///
/// States older than the max age are treated as absent and pruned on access.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionData>>,
    max_age: Duration,
}

impl InMemorySessionStore {
    /// Create a store with the default state lifetime (10 minutes).
    pub fn new() -> Self {
        Self::with_max_age(DEFAULT_STATE_MAX_AGE)
    }

    /// Create a store with a custom state lifetime.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionData>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn session<'a>(
        sessions: &'a mut HashMap<String, SessionData>,
        session: &str,
    ) -> &'a mut SessionData {
        let data = sessions.entry(session.to_string()).or_default();
        data.touched_at = Instant::now();
        data
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn save_client_url(&self, session: &str, url: &str) {
        let mut sessions = self.lock();
        Self::session(&mut sessions, session).client_url = Some(url.to_string());
    }

    fn client_url(&self, session: &str) -> Option<String> {
        self.lock()
            .get(session)
            .and_then(|data| data.client_url.clone())
    }

    fn save_state(&self, session: &str, state: &str) {
        let mut sessions = self.lock();
        let data = Self::session(&mut sessions, session);
        data.prune(self.max_age);
        data.states.push(PendingState {
            value: state.to_string(),
            issued_at: Instant::now(),
        });
    }

    fn consume_state(&self, session: &str, state: &str) -> bool {
        let mut sessions = self.lock();
        let Some(data) = sessions.get_mut(session) else {
            return false;
        };
        let Some(index) = data.states.iter().position(|s| s.value == state) else {
            data.prune(self.max_age);
            return false;
        };

        let pending = data.states.remove(index);
        data.prune(self.max_age);
        let fresh = pending.issued_at.elapsed() < self.max_age;
        if !fresh {
            debug!(session, "Pending state expired");
        }
        fresh
    }

    fn clear_expired(&self) {
        let mut sessions = self.lock();
        for data in sessions.values_mut() {
            data.prune(self.max_age);
        }
        sessions.retain(|_, data| !data.is_stale(self.max_age));
    }
}

/// Random `state` value: 32 bytes, URL-safe base64 without padding.
pub fn generate_state() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}
