// src/collector.rs
//! Run orchestration: walk the feed blocks in their fixed order, fetch and
//! normalize each feed, merge and rank, publish atomically. Progress is
//! reported to the status file after every feed; the final note carries
//! either the item count or the error.

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::path::Path;

use crate::ingest::config::FeedsConfig;
use crate::ingest::{FeedClient, MAX_ENTRIES_PER_FEED};
use crate::merge::PublishedCollection;
use crate::normalize::{NormalizedItem, Normalizer};
use crate::output::write_json_atomic;
use crate::sources::domain_of;
use crate::status::{CollectorStatus, StatusWriter};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collector_entries_total",
            "Raw entries parsed out of fetched feeds."
        );
        describe_counter!(
            "collector_items_kept_total",
            "Items that passed exclusion and the relevance gate."
        );
        describe_counter!(
            "collector_items_dropped_total",
            "Entries dropped by exclusion, blocking, or the relevance gate."
        );
        describe_counter!("collector_feed_errors_total", "Feed fetch/parse failures.");
        describe_histogram!("collector_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "collector_last_run_ts",
            "Unix ts when a collection run last finished."
        );
    });
}

pub struct Collector {
    client: FeedClient,
    feeds: FeedsConfig,
    normalizer: Normalizer,
    status: StatusWriter,
}

impl Collector {
    pub fn new(
        client: FeedClient,
        feeds: FeedsConfig,
        normalizer: Normalizer,
        status: StatusWriter,
    ) -> Self {
        Self {
            client,
            feeds,
            normalizer,
            status,
        }
    }

    /// One full run: collect, merge, publish to `data_file`. Returns the
    /// number of published items. The status file gets a final note and
    /// `finished_at` stamp on both success and failure.
    pub async fn run(&self, data_file: &Path) -> Result<usize> {
        ensure_metrics_described();

        let mut status = CollectorStatus::begin(self.feeds.total_feeds());
        self.status.write(&status);

        let result = self.collect_and_publish(data_file, &mut status).await;

        match &result {
            Ok(n) => status.finish(format!("Collected {n} items")),
            Err(e) => status.finish(format!("ERROR: {e:#}")),
        }
        self.status.write(&status);
        gauge!("collector_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

        result
    }

    async fn collect_and_publish(
        &self,
        data_file: &Path,
        status: &mut CollectorStatus,
    ) -> Result<usize> {
        let mut items: Vec<NormalizedItem> = Vec::new();

        for block in self.feeds.blocks() {
            tracing::info!(block = block.name, feeds = block.urls.len(), "processing block");
            for url in block.urls {
                status.current = {
                    let dom = domain_of(url);
                    if dom.is_empty() {
                        url.clone()
                    } else {
                        dom
                    }
                };
                self.status.write(status);

                let (feed_title, entries) = self.client.fetch_feed(url).await;
                let mut kept = 0usize;
                let mut dropped = 0usize;
                for entry in entries.iter().take(MAX_ENTRIES_PER_FEED) {
                    match self.normalizer.normalize(entry, &feed_title, block.kind).await {
                        Some(item) => {
                            items.push(item);
                            kept += 1;
                        }
                        None => dropped += 1,
                    }
                }
                counter!("collector_items_kept_total").increment(kept as u64);
                counter!("collector_items_dropped_total").increment(dropped as u64);
                tracing::debug!(url, kept, dropped, "feed done");

                status.done += 1;
                self.status.write(status);
            }
        }

        let collection = PublishedCollection::new(items);
        write_json_atomic(data_file, &collection).context("publishing collection")?;
        tracing::info!(
            items = collection.items.len(),
            path = %data_file.display(),
            "collection published"
        );
        Ok(collection.items.len())
    }
}
