// src/sources.rs
//! Source provenance: URL → domain, feed-title cleanup, and the
//! major/local/social publication-tier classification.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Domains we never ingest from (link spam observed in the wild).
pub const BLOCKED_DOMAINS: &[&str] = &["bigorre.org"];

/// Outlets (and authorities) whose items rank as "major-news".
/// Matching is by domain suffix, so `news.bbc.co.uk` matches `bbc.co.uk`.
pub const MAJOR_DOMAINS: &[&str] = &[
    "reuters.com",
    "bbc.co.uk",
    "apnews.com",
    "theguardian.com",
    "nytimes.com",
    "bloomberg.com",
    "ft.com",
    "cnn.com",
    "aljazeera.com",
    "sky.com",
    "latimes.com",
    "cbc.ca",
    "theglobeandmail.com",
    "scmp.com",
    "straitstimes.com",
    "japantimes.co.jp",
    "avherald.com",
    "gov.uk",
    "faa.gov",
    "easa.europa.eu",
    "caa.co.uk",
    "ntsb.gov",
    "bea.aero",
    "atsb.gov.au",
    "caa.govt.nz",
    "caa.co.za",
    "tc.gc.ca",
    "noaa.gov",
    "nhc.noaa.gov",
    "weather.gov",
];

/// What a feed declares itself to be in `feeds.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    News,
    Social,
}

/// Publication tier of a normalized item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCategory {
    MajorNews,
    LocalNews,
    Social,
}

/// Extract the host from a URL, lowercased, `www.` stripped.
/// Unparseable input yields an empty string.
pub fn domain_of(url: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)https?://([^/\s]+)").unwrap());
    let host = re
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

pub fn is_blocked(domain: &str) -> bool {
    BLOCKED_DOMAINS.iter().any(|d| domain == *d)
}

/// Display name for a feed: the feed title minus trailing "- RSS ..." /
/// "RSS Feed ..." decorations; blank titles fall back to the URL's domain.
pub fn clean_source_name(feed_title: &str, url: &str) -> String {
    static RE_DASH_RSS: OnceCell<Regex> = OnceCell::new();
    static RE_RSS_FEED: OnceCell<Regex> = OnceCell::new();
    let re_dash = RE_DASH_RSS.get_or_init(|| Regex::new(r"(?i)\s*[-\u{2013}\u{2014}]\s*RSS.*$").unwrap());
    let re_feed = RE_RSS_FEED.get_or_init(|| Regex::new(r"(?i)\s*RSS\s*Feed.*$").unwrap());

    let t = feed_title.trim();
    if t.is_empty() {
        return domain_of(url);
    }
    let t = re_dash.replace(t, "");
    let t = re_feed.replace(&t, "");
    t.trim().to_string()
}

/// Tier classification: a declared social feed is always `social`;
/// everything else is `major-news` iff the domain suffix-matches the
/// major-outlet set, otherwise `local-news`.
pub fn classify_source(declared: FeedKind, domain: &str) -> SourceCategory {
    if declared == FeedKind::Social {
        return SourceCategory::Social;
    }
    if MAJOR_DOMAINS.iter().any(|d| domain.ends_with(d)) {
        SourceCategory::MajorNews
    } else {
        SourceCategory::LocalNews
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_strips_www_and_lowercases() {
        assert_eq!(domain_of("https://WWW.Example.com/a/b"), "example.com");
        assert_eq!(domain_of("http://news.bbc.co.uk/rss"), "news.bbc.co.uk");
        assert_eq!(domain_of("not a url"), "");
    }

    #[test]
    fn major_is_suffix_match() {
        assert_eq!(
            classify_source(FeedKind::News, "news.bbc.co.uk"),
            SourceCategory::MajorNews
        );
        assert_eq!(
            classify_source(FeedKind::News, "smalltownpaper.example"),
            SourceCategory::LocalNews
        );
    }

    #[test]
    fn declared_social_wins_over_domain() {
        assert_eq!(
            classify_source(FeedKind::Social, "reuters.com"),
            SourceCategory::Social
        );
    }

    #[test]
    fn source_name_trims_rss_decorations() {
        assert_eq!(
            clean_source_name("Aviation Herald - RSS feed", "https://avherald.com/rss"),
            "Aviation Herald"
        );
        assert_eq!(
            clean_source_name("Airport Watch RSS Feed (full)", "https://x.example/rss"),
            "Airport Watch"
        );
        assert_eq!(
            clean_source_name("  ", "https://www.caa.co.uk/rss"),
            "caa.co.uk"
        );
    }

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SourceCategory::MajorNews).unwrap(),
            "\"major-news\""
        );
        assert_eq!(
            serde_json::to_string(&SourceCategory::LocalNews).unwrap(),
            "\"local-news\""
        );
    }
}
