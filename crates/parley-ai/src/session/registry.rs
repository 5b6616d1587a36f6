//! Per-owner session store.
//!
//! Maps an owner key (user, channel, ...) to its own `ChatSession`. Each
//! session sits behind a `tokio::sync::Mutex` held for the whole turn, so
//! concurrent prompts for one owner run one after another while different
//! owners proceed in parallel.
//!
//! Sessions are never dropped on their own. Callers own eviction, either per
//! key with [`SessionRegistry::remove`] or in bulk with
//! [`SessionRegistry::reap_idle`] on a timer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};

use parley_common::{IdGenerator, UuidGenerator};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::transport::Transport;
use crate::{ChatError, TurnOutcome};

use super::config::SessionConfig;
use super::manager::ChatSession;

pub type SharedSession = Arc<Mutex<ChatSession>>;

struct Slot {
    session: SharedSession,
    last_used: std::sync::Mutex<Instant>,
}

impl Slot {
    fn new(session: SharedSession) -> Self {
        Self {
            session,
            last_used: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) -> SharedSession {
        *self.last_used.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
        self.session.clone()
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last = *self.last_used.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last)
    }
}

/// Thread-safe session store.
#[derive(Clone)]
pub struct SessionRegistry {
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    ids: Arc<dyn IdGenerator>,
    sessions: Arc<RwLock<HashMap<String, Slot>>>,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            ids: Arc::new(UuidGenerator),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Get the session for `key`, creating it on first use. Either way the
    /// session counts as used now.
    pub async fn session(&self, key: &str) -> Result<SharedSession, ChatError> {
        if let Some(slot) = self.sessions.read().await.get(key) {
            return Ok(slot.touch());
        }

        let mut map = self.sessions.write().await;
        if let Some(slot) = map.get(key) {
            return Ok(slot.touch());
        }
        let session = ChatSession::new(self.config.clone(), self.transport.clone())?
            .with_id_generator(self.ids.clone());
        let shared = Arc::new(Mutex::new(session));
        map.insert(key.to_string(), Slot::new(shared.clone()));
        debug!(owner = key, sessions = map.len(), "Session created");
        Ok(shared)
    }

    /// Run one turn on `key`'s session, waiting for any turn already in flight.
    pub async fn send_turn(&self, key: &str, prompt: &str) -> Result<TurnOutcome, ChatError> {
        let session = self.session(key).await?;
        let mut session = session.lock().await;
        session.send_turn(prompt).await
    }

    /// Like [`SessionRegistry::send_turn`], collapsing 429 into the notice text.
    pub async fn send_message(&self, key: &str, prompt: &str) -> Result<String, ChatError> {
        self.send_turn(key, prompt).await.map(TurnOutcome::into_text)
    }

    /// Drop `key`'s session. Returns whether one existed.
    pub async fn remove(&self, key: &str) -> bool {
        let removed = self.sessions.write().await.remove(key).is_some();
        if removed {
            debug!(owner = key, "Session removed");
        }
        removed
    }

    /// Drop every session unused for at least `max_idle`. Sessions with a
    /// turn in flight are kept. Returns how many were dropped.
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        let mut map = self.sessions.write().await;
        let before = map.len();
        let now = Instant::now();
        map.retain(|owner, slot| {
            let stale = slot.idle_for(now) >= max_idle && slot.session.try_lock().is_ok();
            if stale {
                info!(owner = %owner, "Reaping idle session");
            }
            !stale
        });
        before - map.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
