//! Feed discovery tool: probe seed sites for working RSS/Atom feeds.
//!
//! Reads one site per line from the seeds file, checks each homepage for
//! `<link rel="alternate">` hints plus a fixed list of conventional feed
//! paths, validates every candidate by fetching and parsing it, and writes
//! the working URLs to a TOML file (a `news_extra` list that can be merged
//! into `config/feeds.toml`).

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gsa_collector::ingest::FeedClient;
use gsa_collector::sources::domain_of;

const ENV_SEEDS_PATH: &str = "DISCOVER_SEEDS_PATH";
const ENV_OUT_PATH: &str = "DISCOVER_OUT_PATH";
const DEFAULT_SEEDS_PATH: &str = "seeds.txt";
const DEFAULT_OUT_PATH: &str = "config/feeds-extra.toml";

const COMMON_HINTS: &[&str] = &[
    "/rss",
    "/rss.xml",
    "/feed",
    "/feeds",
    "/atom",
    "/index.xml",
    "/category/news/feed",
    "/?feed=rss2",
    "/?feed=atom",
];

#[derive(Serialize)]
struct ExtraFeeds {
    news_extra: Vec<String>,
}

/// `https://host/` for any seed, prepending a scheme when missing.
fn homepage(seed: &str) -> Option<String> {
    let with_scheme = if seed.starts_with("http://") || seed.starts_with("https://") {
        seed.to_string()
    } else {
        format!("https://{seed}")
    };
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"^(https?://[^/\s]+)").unwrap());
    re.captures(&with_scheme)
        .map(|c| format!("{}/", c.get(1).unwrap().as_str()))
}

/// Feed hints declared in the page head: `<link rel="alternate">` with an
/// rss/atom/xml media type.
fn rel_alternate_links(base: &str, html: &str) -> Vec<String> {
    static RE_LINK: OnceCell<Regex> = OnceCell::new();
    static RE_ATTR: OnceCell<Regex> = OnceCell::new();
    let re_link = RE_LINK.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>").unwrap());
    let re_attr = RE_ATTR
        .get_or_init(|| Regex::new(r#"(?i)(rel|type|href)\s*=\s*["']([^"']*)["']"#).unwrap());

    let mut out = Vec::new();
    for tag in re_link.find_iter(html) {
        let mut rel = String::new();
        let mut typ = String::new();
        let mut href = String::new();
        for cap in re_attr.captures_iter(tag.as_str()) {
            match cap[1].to_ascii_lowercase().as_str() {
                "rel" => rel = cap[2].to_ascii_lowercase(),
                "type" => typ = cap[2].to_ascii_lowercase(),
                "href" => href = cap[2].to_string(),
                _ => {}
            }
        }
        if href.is_empty() || !rel.contains("alternate") {
            continue;
        }
        if !(typ.contains("rss") || typ.contains("atom") || typ.contains("xml")) {
            continue;
        }
        out.push(absolutize(base, &href));
    }
    out
}

fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), href)
    } else {
        format!("{base}{href}")
    }
}

fn looks_like_feed(url: &str) -> bool {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)(rss|atom|feed)(\.xml|/)?($|\?)").unwrap());
    re.is_match(url)
}

/// Candidate URLs for one seed: rel-alternate hints + conventional paths
/// (+ the seed itself when it already looks like a feed), kept only when
/// fetching and parsing them yields entries.
async fn discover_for_seed(client: FeedClient, seed: String) -> Vec<String> {
    let mut candidates: BTreeSet<String> = BTreeSet::new();

    if let Some(root) = homepage(&seed) {
        if let Ok(html) = client.get_text(&root).await {
            candidates.extend(rel_alternate_links(&root, &html));
        }
        for hint in COMMON_HINTS {
            candidates.insert(format!("{}{}", root.trim_end_matches('/'), hint));
        }
    }
    if looks_like_feed(&seed) {
        candidates.insert(seed.clone());
    }

    let mut good = Vec::new();
    for url in candidates {
        let (_, entries) = client.fetch_feed(&url).await;
        if !entries.is_empty() {
            good.push(url);
        }
    }
    good
}

/// Path component after the domain, lowercased, for (domain, path) dedup.
fn path_of(url: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)https?://[^/]+(/[^?#]*)").unwrap());
    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "/".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let seeds_path =
        std::env::var(ENV_SEEDS_PATH).unwrap_or_else(|_| DEFAULT_SEEDS_PATH.to_string());
    let out_path = std::env::var(ENV_OUT_PATH).unwrap_or_else(|_| DEFAULT_OUT_PATH.to_string());

    let raw = std::fs::read_to_string(&seeds_path)
        .with_context(|| format!("reading seeds from {seeds_path} (one site per line)"))?;
    let seeds: Vec<String> = raw
        .lines()
        .map(|l| l.split('#').next().unwrap_or("").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    info!(seeds = seeds.len(), "probing for feeds");

    let client = FeedClient::new()?;
    let t0 = std::time::Instant::now();

    let mut set = JoinSet::new();
    for seed in seeds {
        set.spawn(discover_for_seed(client.clone(), seed));
    }

    let mut all_good: BTreeSet<String> = BTreeSet::new();
    while let Some(res) = set.join_next().await {
        match res {
            Ok(found) => all_good.extend(found),
            Err(e) => warn!(error = %e, "discovery task panicked"),
        }
    }

    // One feed per (domain, path); first in sorted order wins.
    let mut deduped: BTreeMap<(String, String), String> = BTreeMap::new();
    for url in &all_good {
        let dom = domain_of(url);
        if dom.is_empty() {
            continue;
        }
        deduped.entry((dom, path_of(url))).or_insert_with(|| url.clone());
    }
    let feeds: Vec<String> = deduped.into_values().collect();

    let out = ExtraFeeds { news_extra: feeds };
    let body = toml::to_string_pretty(&out).context("serializing discovered feeds")?;
    std::fs::write(&out_path, body).with_context(|| format!("writing {out_path}"))?;

    info!(
        feeds = out.news_extra.len(),
        secs = t0.elapsed().as_secs_f64(),
        path = %out_path,
        "discovery finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homepage_normalizes_scheme_and_path() {
        assert_eq!(homepage("example.com/a/b").as_deref(), Some("https://example.com/"));
        assert_eq!(
            homepage("http://news.example/x").as_deref(),
            Some("http://news.example/")
        );
    }

    #[test]
    fn rel_alternate_extraction() {
        let html = r#"<html><head>
            <link rel="alternate" type="application/rss+xml" href="/rss.xml">
            <link rel="stylesheet" href="/style.css">
            <link rel="alternate" type="application/atom+xml" href="https://other.example/atom">
        </head></html>"#;
        let links = rel_alternate_links("https://example.com/", html);
        assert_eq!(
            links,
            vec![
                "https://example.com/rss.xml".to_string(),
                "https://other.example/atom".to_string()
            ]
        );
    }

    #[test]
    fn seed_that_is_already_a_feed_is_recognized() {
        assert!(looks_like_feed("https://example.com/feed"));
        assert!(looks_like_feed("https://example.com/rss.xml?lang=en"));
        assert!(!looks_like_feed("https://example.com/about"));
    }

    #[test]
    fn path_dedup_key_is_lowercased() {
        assert_eq!(path_of("https://example.com/RSS.xml"), "/rss.xml");
        assert_eq!(path_of("https://example.com"), "/");
    }
}
