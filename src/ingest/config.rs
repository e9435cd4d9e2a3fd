// src/ingest/config.rs
//! Feed-list configuration (`config/feeds.toml`): five URL groups, the
//! first four declared as news, the last as social. A missing or broken
//! file degrades to an empty config.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::sources::FeedKind;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedsConfig {
    #[serde(default)]
    pub news: Vec<String>,
    #[serde(default)]
    pub aviation_authorities: Vec<String>,
    #[serde(default)]
    pub official_announcements: Vec<String>,
    #[serde(default)]
    pub weather_alerts: Vec<String>,
    #[serde(default)]
    pub social: Vec<String>,
}

/// One group of feed URLs with its declared kind.
pub struct FeedBlock<'a> {
    pub name: &'static str,
    pub kind: FeedKind,
    pub urls: &'a [String],
}

impl FeedsConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "feeds config unavailable, no feeds");
                return Self::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "feeds config unparseable, no feeds");
                Self::default()
            }
        }
    }

    /// Blocks in their fixed processing order.
    pub fn blocks(&self) -> Vec<FeedBlock<'_>> {
        vec![
            FeedBlock {
                name: "news",
                kind: FeedKind::News,
                urls: &self.news,
            },
            FeedBlock {
                name: "aviation_authorities",
                kind: FeedKind::News,
                urls: &self.aviation_authorities,
            },
            FeedBlock {
                name: "official_announcements",
                kind: FeedKind::News,
                urls: &self.official_announcements,
            },
            FeedBlock {
                name: "weather_alerts",
                kind: FeedKind::News,
                urls: &self.weather_alerts,
            },
            FeedBlock {
                name: "social",
                kind: FeedKind::Social,
                urls: &self.social,
            },
        ]
    }

    pub fn total_feeds(&self) -> usize {
        self.blocks().iter().map(|b| b.urls.len()).sum()
    }
}
