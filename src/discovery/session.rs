use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-visitor discovery state: the seed that orders the curated terms, the
/// ids already surfaced, and how far each bucket has walked its term list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub seed: u64,
    #[serde(default)]
    seen: BTreeSet<String>,
    #[serde(default)]
    cursors: BTreeMap<String, usize>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start() -> Self {
        Self::with_seed(rand::rng().random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            seen: BTreeSet::new(),
            cursors: BTreeMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.started_at >= ttl
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn mark_seen(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn cursor(&self, bucket: &str) -> usize {
        self.cursors.get(bucket).copied().unwrap_or(0)
    }

    pub fn advance(&mut self, bucket: &str, steps: usize) {
        *self.cursors.entry(bucket.to_string()).or_insert(0) += steps;
    }

    pub fn set_cursor(&mut self, bucket: &str, cursor: usize) {
        self.cursors.insert(bucket.to_string(), cursor);
    }
}
