//! In-memory cache transport for tests.

use super::{CacheConnection, CacheError, ConnectionFactory};
use async_trait::async_trait;
use catalog_config::AccessMode;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

#[derive(Default)]
struct Shared {
    entries: Mutex<HashMap<String, Entry>>,
    unavailable: AtomicBool,
    connects: AtomicUsize,
}

/// A key-value store held in process memory.
///
/// Clones share state, so a test can keep one clone for inspection while a
/// [`CacheClientProvider`](super::CacheClientProvider) hands out others.
/// [`set_unavailable`](Self::set_unavailable) makes every command fail the
/// way a refused connection does.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    shared: Arc<Shared>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the server going down (`true`) or coming back (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of handles built through [`ConnectionFactory::connect`].
    #[must_use]
    pub fn connects(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    /// Live keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .shared
            .entries
            .lock()
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Returns true if `key` holds a live value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.shared
            .entries
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_live(Instant::now()))
    }

    /// Remaining time to live of `key`, `None` if absent or persistent.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.shared
            .entries
            .lock()
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Stores raw text directly, bypassing the codec.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.shared.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.shared.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("Connection refused (os error 111)".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheConnection for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;
        let now = Instant::now();
        let mut entries = self.shared.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.check_available()?;
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.shared.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        self.check_available()?;
        Ok(self
            .keys()
            .into_iter()
            .filter(|key| glob_match(pattern, key))
            .collect())
    }

    async fn del(&self, key: &str) -> Result<u64, CacheError> {
        self.check_available()?;
        let removed = self.shared.entries.lock().remove(key);
        Ok(u64::from(removed.is_some()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check_available()
    }
}

impl ConnectionFactory for InMemoryCache {
    fn connect(&self, _mode: AccessMode) -> Result<Arc<dyn CacheConnection>, CacheError> {
        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.clone()))
    }
}

/// Redis-style glob matching for `*` and `?`.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}
