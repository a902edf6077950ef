//! Caller-owned market data cache.
//!
//! Entries expire after a fixed time-to-live. The current time is always
//! passed in, so the cache itself never reads the clock.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::Candle;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
struct Entry {
    candles: Arc<[Candle]>,
    stored_at: DateTime<Utc>,
}

/// Candles per symbol, valid for `ttl` after they were stored.
///
/// ### Example
/// ```rust
/// use ghost_bars::prelude::*;
/// use chrono::{DateTime, Duration};
///
/// let now = DateTime::default();
/// let mut cache = Cache::new(Duration::seconds(10));
/// cache.put("GC=F", Vec::<Candle>::new(), now);
///
/// assert!(cache.get("GC=F", now + Duration::seconds(5)).is_some());
/// assert!(cache.get("GC=F", now + Duration::seconds(10)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    ttl: Duration,
    entries: HashMap<String, Entry>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(Duration::seconds(10))
    }
}

impl Cache {
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the time-to-live of an entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the candles for `symbol` if they are younger than the ttl at `now`.
    pub fn get(&self, symbol: &str, now: DateTime<Utc>) -> Option<Arc<[Candle]>> {
        let entry = self.entries.get(symbol)?;
        if now - entry.stored_at < self.ttl {
            tracing::trace!(symbol, "cache hit");
            Some(Arc::clone(&entry.candles))
        } else {
            tracing::trace!(symbol, "cache expired");
            None
        }
    }

    /// Stores `candles` for `symbol`, replacing any previous entry.
    pub fn put(&mut self, symbol: impl Into<String>, candles: impl Into<Arc<[Candle]>>, now: DateTime<Utc>) {
        let entry = Entry {
            candles: candles.into(),
            stored_at: now,
        };
        self.entries.insert(symbol.into(), entry);
    }

    /// Drops the entry for `symbol`. Returns `true` if there was one.
    pub fn invalidate(&mut self, symbol: &str) -> bool {
        self.entries.remove(symbol).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
