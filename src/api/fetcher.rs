//! Cache-backed card lookups.

use std::collections::HashSet;

use chrono::Utc;

use super::cache::CardCache;
use super::client::{CardSource, FetchError};
use super::types::Card;

/// Current time in epoch seconds, the unit cache entries are stored in.
pub fn now_epoch() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Resolves card names through the cache, falling back to a [`CardSource`].
pub struct CardFetcher<'a, S: CardSource> {
    source: &'a S,
    cache: &'a mut CardCache,
    refresh: bool,
    fetched: HashSet<String>,
    requests: usize,
}

impl<'a, S: CardSource> CardFetcher<'a, S> {
    pub fn new(source: &'a S, cache: &'a mut CardCache) -> Self {
        Self {
            source,
            cache,
            refresh: false,
            fetched: HashSet::new(),
            requests: 0,
        }
    }

    /// Treat cached entries as expired unless this fetcher stored them.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Look up a card by exact name.
    ///
    /// Returns `Ok(None)` when the source has no card by that name.
    pub fn fetch(&mut self, name: &str) -> Result<Option<Card>, FetchError> {
        self.fetch_at(name, now_epoch())
    }

    /// Look up a card as of `now` (epoch seconds).
    pub fn fetch_at(&mut self, name: &str, now: f64) -> Result<Option<Card>, FetchError> {
        if !self.refresh || self.fetched.contains(name) {
            if let Some(card) = self.cache.get_fresh(name, now) {
                log::debug!("Cache hit for {}", name);
                return Ok(Some(card.clone()));
            }
        }

        log::debug!("Cache miss for {}", name);
        self.requests += 1;

        let Some(card) = self.source.named(name)? else {
            return Ok(None);
        };

        self.cache.insert(name, now, card.clone());
        self.fetched.insert(name.to_string());
        Ok(Some(card))
    }

    /// Number of lookups that went to the source.
    pub fn requests(&self) -> usize {
        self.requests
    }
}
