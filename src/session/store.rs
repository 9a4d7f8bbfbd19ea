//! Session Store
//!
//! Owns every visitor session and its visit counts. Sessions are created on
//! first visit, identified by a random UUID carried in a cookie, and swept
//! once idle past the configured timeout.

use super::counter::{CountryVisitCounts, VisitRow};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session identifier (UUID v4 string)
pub type SessionId = String;

/// Configuration for the session store
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Sessions not seen for this long are dropped
    pub idle_timeout: Duration,
    /// How often the background sweep runs
    pub sweep_interval: Duration,
    /// Upper bound on live sessions
    pub max_sessions: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
            max_sessions: 10_000,
        }
    }
}

/// A single visitor session
#[derive(Debug)]
struct Session {
    started_at: DateTime<Utc>,
    last_seen: Instant,
    visits: CountryVisitCounts,
}

impl Session {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            last_seen: Instant::now(),
            visits: CountryVisitCounts::new(),
        }
    }

    fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.last_seen.elapsed() > idle_timeout
    }

    fn snapshot(&self, id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: id.to_string(),
            started_at: self.started_at,
            total_visits: self.visits.total(),
            rows: self.visits.ranked(),
        }
    }
}

/// Read-only copy of a session's counts
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub total_visits: u64,
    pub rows: Vec<VisitRow>,
}

/// Result of recording a visit
#[derive(Debug, Clone)]
pub struct VisitOutcome {
    /// True if a new session was opened for this visit
    pub created: bool,
    /// Count for the visitor's country after this visit
    pub country_visits: u64,
    pub snapshot: SessionSnapshot,
}

/// Store of all live sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    config: SessionStoreConfig,
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Record one visit from `country` in the caller's session
    ///
    /// An unknown or expired `session_id` opens a fresh session; client
    /// supplied ids are never adopted.
    pub async fn record_visit(&self, session_id: Option<&str>, country: &str) -> VisitOutcome {
        let mut sessions = self.sessions.write().await;

        let existing = session_id
            .filter(|id| {
                sessions
                    .get(*id)
                    .map(|s| !s.is_expired(self.config.idle_timeout))
                    .unwrap_or(false)
            })
            .map(str::to_string);

        let (id, created) = match existing {
            Some(id) => (id, false),
            None => {
                if let Some(stale) = session_id {
                    sessions.remove(stale);
                }
                if sessions.len() >= self.config.max_sessions {
                    evict_least_recent(&mut sessions);
                }

                let id = Uuid::new_v4().to_string();
                sessions.insert(id.clone(), Session::new());
                tracing::debug!(session_id = %id, "Session opened");
                (id, true)
            }
        };

        // present by construction: either found above or just inserted
        let session = sessions
            .entry(id.clone())
            .or_insert_with(Session::new);
        session.last_seen = Instant::now();
        let country_visits = session.visits.record(country);

        tracing::debug!(
            session_id = %id,
            country = %country,
            visits = country_visits,
            "Visit recorded"
        );

        VisitOutcome {
            created,
            country_visits,
            snapshot: session.snapshot(&id),
        }
    }

    /// Current counts for a live session, without recording a visit
    pub async fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|s| !s.is_expired(self.config.idle_timeout))
            .map(|s| s.snapshot(session_id))
    }

    /// Drop sessions idle past the timeout, returning how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.config.idle_timeout));
        before - sessions.len()
    }

    /// Number of live sessions (including not-yet-swept expired ones)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }

    /// Spawn the periodic idle-session sweep
    pub fn start_background_sweep(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let period = store.config.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);

            loop {
                ticker.tick().await;

                let removed = store.sweep_expired().await;
                if removed > 0 {
                    tracing::info!(removed, "Swept idle sessions");
                }
            }
        })
    }
}

fn evict_least_recent(sessions: &mut HashMap<SessionId, Session>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, s)| s.last_seen)
        .map(|(id, _)| id.clone());

    if let Some(id) = oldest {
        sessions.remove(&id);
        tracing::warn!(session_id = %id, "Session limit reached, evicted least recent session");
    }
}
