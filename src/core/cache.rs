use crate::domain::model::{RatePair, SessionRecord};
use crate::domain::ports::SessionStore;
use crate::utils::error::Result;

pub const DEFAULT_SESSION_KEY: &str = "fx_rates_v1";

/// Session-scoped holder of the last successfully fetched rate pair.
///
/// The pair is stored as a single serialized record, so a write replaces EUR
/// and USD together. Anything unreadable under the key counts as a miss.
pub struct RateCache<S: SessionStore> {
    store: S,
    key: String,
}

impl<S: SessionStore> RateCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SESSION_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Option<RatePair> {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Session store not available: {}", e);
                return None;
            }
        };

        let record: SessionRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to parse session rates: {}", e);
                return None;
            }
        };

        let pair = record.into_pair();
        if pair.is_none() {
            tracing::warn!("Ignoring session rates with non-positive values");
        }
        pair
    }

    pub fn put(&self, pair: &RatePair) -> Result<()> {
        let payload = serde_json::to_string(&SessionRecord::from(pair))?;
        self.store.set_item(&self.key, &payload)?;
        tracing::debug!("Stored rates under session key '{}'", self.key);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove_item(&self.key)
    }
}
