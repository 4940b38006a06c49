//! Bounded per-session conversation memory.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

/// Most recent exchanges kept per session.
pub const MAX_EXCHANGES: usize = 5;

/// One question/answer turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub user: String,
    pub bot: String,
}

/// Keyed store of recent exchanges.
///
/// Every method is atomic with respect to the others; `append` never lets a
/// session exceed [`MAX_EXCHANGES`] entries, oldest dropped first.
pub trait SessionStore: Send + Sync {
    /// Creates the session if it does not exist (or has expired) and marks it as used.
    fn ensure(&self, id: &str);
    /// Exchanges in chronological order; empty for unknown sessions.
    fn history(&self, id: &str) -> Vec<Exchange>;
    /// Appends `exchange`, creating the session when needed.
    fn append(&self, id: &str, exchange: Exchange);
    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct SessionSlot {
    exchanges: VecDeque<Exchange>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new(now: Instant) -> Self {
        Self {
            exchanges: VecDeque::with_capacity(MAX_EXCHANGES + 1),
            last_seen: now,
        }
    }
}

/// In-process [`SessionStore`] with idle expiry and a capacity cap.
///
/// Sessions idle longer than `ttl` are dropped on access; when a new session
/// would exceed `max_sessions`, the least recently used one is evicted.
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<String, SessionSlot>>,
    ttl: Duration,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionSlot>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, slot: &SessionSlot, now: Instant) -> bool {
        now.duration_since(slot.last_seen) > self.ttl
    }

    /// Returns the live slot for `id`, creating it after pruning/evicting if needed.
    fn slot_mut<'m>(
        &self,
        map: &'m mut HashMap<String, SessionSlot>,
        id: &str,
        now: Instant,
    ) -> &'m mut SessionSlot {
        let live = map.get(id).is_some_and(|s| !self.is_expired(s, now));
        if !live {
            map.remove(id);
            map.retain(|_, s| !self.is_expired(s, now));
            if map.len() >= self.max_sessions {
                if let Some(oldest) = map
                    .iter()
                    .min_by_key(|(_, s)| s.last_seen)
                    .map(|(k, _)| k.clone())
                {
                    debug!(session = %oldest, "evicting least recently used session");
                    map.remove(&oldest);
                }
            }
        }

        let slot = map
            .entry(id.to_string())
            .or_insert_with(|| SessionSlot::new(now));
        slot.last_seen = now;
        slot
    }
}

impl SessionStore for InMemorySessionStore {
    fn ensure(&self, id: &str) {
        let mut map = self.lock();
        self.slot_mut(&mut map, id, Instant::now());
    }

    fn history(&self, id: &str) -> Vec<Exchange> {
        let now = Instant::now();
        let mut map = self.lock();
        match map.get_mut(id) {
            Some(slot) if !self.is_expired(slot, now) => {
                slot.last_seen = now;
                slot.exchanges.iter().cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    fn append(&self, id: &str, exchange: Exchange) {
        let mut map = self.lock();
        let slot = self.slot_mut(&mut map, id, Instant::now());
        slot.exchanges.push_back(exchange);
        while slot.exchanges.len() > MAX_EXCHANGES {
            slot.exchanges.pop_front();
        }
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(i: usize) -> Exchange {
        Exchange {
            user: format!("q{i}"),
            bot: format!("a{i}"),
        }
    }

    #[test]
    fn keeps_only_the_last_five_turns() {
        let store = InMemorySessionStore::new(Duration::from_secs(60), 10);
        for i in 1..=7 {
            store.append("s", turn(i));
        }
        let history = store.history("s");
        assert_eq!(history, (3..=7).map(turn).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_session_has_no_history_and_is_not_created() {
        let store = InMemorySessionStore::new(Duration::from_secs(60), 10);
        assert!(store.history("nope").is_empty());
        assert!(store.is_empty());
        store.ensure("yes");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn idle_sessions_expire() {
        let store = InMemorySessionStore::new(Duration::from_millis(20), 10);
        store.append("s", turn(1));
        std::thread::sleep(Duration::from_millis(40));
        assert!(store.history("s").is_empty());

        store.append("s", turn(2));
        assert_eq!(store.history("s"), vec![turn(2)]);
    }

    #[test]
    fn evicts_least_recently_used_at_capacity() {
        let store = InMemorySessionStore::new(Duration::from_secs(60), 2);
        store.append("a", turn(1));
        std::thread::sleep(Duration::from_millis(2));
        store.append("b", turn(2));
        std::thread::sleep(Duration::from_millis(2));
        // Touch "a" so "b" becomes the oldest.
        assert_eq!(store.history("a").len(), 1);
        std::thread::sleep(Duration::from_millis(2));
        store.ensure("c");

        assert_eq!(store.len(), 2);
        assert!(store.history("b").is_empty());
        assert_eq!(store.history("a"), vec![turn(1)]);
    }

    #[test]
    fn concurrent_appends_stay_bounded() {
        let store = std::sync::Arc::new(InMemorySessionStore::new(Duration::from_secs(60), 10));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.append("shared", turn(t * 100 + i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.history("shared").len(), MAX_EXCHANGES);
    }
}
