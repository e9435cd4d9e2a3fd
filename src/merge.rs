// src/merge.rs
//! Merge & rank: the join point of the pipeline. Deduplicates by item
//! identity (freshest `published_at` wins, ties keep the first seen),
//! sorts newest-first with the identity string as deterministic
//! secondary key, and caps the output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::normalize::NormalizedItem;

/// Hard cap on the published collection.
pub const MAX_ITEMS: usize = 600;

/// The artifact the dashboard reads; rebuilt whole on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedCollection {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<NormalizedItem>,
}

impl PublishedCollection {
    pub fn new(items: Vec<NormalizedItem>) -> Self {
        Self {
            generated_at: Utc::now(),
            items: merge_and_rank(items),
        }
    }
}

/// Deduplicate, sort, truncate. Idempotent: feeding the output back in
/// yields the same sequence.
pub fn merge_and_rank(items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    let mut best: HashMap<String, NormalizedItem> = HashMap::with_capacity(items.len());
    for it in items {
        match best.get(&it.id) {
            Some(existing) if it.published_at <= existing.published_at => {}
            _ => {
                best.insert(it.id.clone(), it);
            }
        }
    }

    let mut out: Vec<NormalizedItem> = best.into_values().collect();
    out.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    out.truncate(MAX_ITEMS);
    out
}
