// src/ingest/mod.rs
//! Feed retrieval. `FeedClient` wraps reqwest with the collector's
//! User-Agent and timeouts; fetch or parse failure degrades to an empty
//! entry list after a warn, never to an error the pipeline has to handle.

pub mod config;
pub mod feedxml;
pub mod types;

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use std::time::Duration;

use crate::ingest::types::RawEntry;
use crate::sources::{domain_of, is_blocked};

const USER_AGENT: &str = concat!("gsa-collector/", env!("CARGO_PKG_VERSION"));
const TOTAL_TIMEOUT_SECS: u64 = 25;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Entries beyond this per feed are ignored (some aggregators ship
/// thousand-item backfills).
pub const MAX_ENTRIES_PER_FEED: usize = 120;

#[derive(Clone)]
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("building feed http client")?;
        Ok(Self { client })
    }

    /// GET a URL as text. Used for feeds and for discovery probes.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("non-2xx from {url}"))?;
        resp.text().await.context("reading response body")
    }

    /// Fetch and parse one feed. Returns `(feed_title, entries)`; the title
    /// falls back to the URL's domain. Blocked domains and any fetch/parse
    /// failure yield an empty entry list.
    pub async fn fetch_feed(&self, url: &str) -> (String, Vec<RawEntry>) {
        let dom = domain_of(url);
        if is_blocked(&dom) {
            tracing::debug!(domain = %dom, "skipping blocked domain");
            return (dom, Vec::new());
        }

        let body = match self.get_text(url).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(url, error = %format!("{e:#}"), "feed fetch failed");
                counter!("collector_feed_errors_total").increment(1);
                return (dom, Vec::new());
            }
        };

        let t0 = std::time::Instant::now();
        match feedxml::parse_feed(&body) {
            Ok((title, entries)) => {
                histogram!("collector_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                counter!("collector_entries_total").increment(entries.len() as u64);
                let title = title.filter(|t| !t.is_empty()).unwrap_or(dom);
                (title, entries)
            }
            Err(e) => {
                tracing::warn!(url, error = %format!("{e:#}"), "feed parse failed");
                counter!("collector_feed_errors_total").increment(1);
                (dom, Vec::new())
            }
        }
    }
}
