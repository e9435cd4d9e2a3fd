// src/normalize.rs
//! # Item Normalizer
//!
//! Turns one raw feed entry into a canonical item, or into nothing.
//! Per-entry order: clean text → derive title → detect/translate →
//! relevance classification (exclusion short-circuits) → publish time →
//! source fields → geo resolution → the relevance gate → category →
//! identity hash. Missing or malformed fields always degrade to defaults;
//! this path never errors out of an entry.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use crate::geomatch::{GeoMatcher, LocationMatch};
use crate::ingest::types::RawEntry;
use crate::relevance::{WatchTerms, TAG_AIRPORT_SECURITY, TAG_DIPLOMATIC};
use crate::sources::{classify_source, clean_source_name, domain_of, is_blocked, FeedKind, SourceCategory};
use crate::translate::Translator;

pub const NO_TITLE: &str = "(no title)";
const FALLBACK_TITLE_CHARS: usize = 160;

/// Geo block embedded in a published item. Serializes to `{}` when no
/// airport matched; the dashboard map reads these exact field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl From<LocationMatch> for Geo {
    fn from(m: LocationMatch) -> Self {
        Geo {
            airport: m.name,
            city: m.city,
            country: m.country,
            iata: m.iata,
            lat: m.lat,
            lon: m.lon,
        }
    }
}

/// One accepted feed entry, immutable once assembled. Field names are the
/// wire contract with the presentation layer: originals and English
/// renditions side by side so translation display can be toggled without
/// re-translating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub id: String,

    pub title_orig: String,
    pub summary_orig: String,
    pub lang: String,
    pub title_en: String,
    pub summary_en: String,

    // Convenience duplicates (default English view).
    pub title: String,
    pub summary: String,

    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub category: SourceCategory,
    pub geo: Geo,
}

pub struct Normalizer {
    matcher: GeoMatcher,
    terms: WatchTerms,
    translator: Box<dyn Translator>,
}

impl Normalizer {
    pub fn new(matcher: GeoMatcher, terms: WatchTerms, translator: Box<dyn Translator>) -> Self {
        Self {
            matcher,
            terms,
            translator,
        }
    }

    /// Normalize one entry. `None` means the item was excluded, blocked,
    /// or failed the relevance gate.
    pub async fn normalize(
        &self,
        entry: &RawEntry,
        feed_title: &str,
        declared: FeedKind,
    ) -> Option<NormalizedItem> {
        let url = entry.url().to_string();

        let summary_clean = strip_html(&entry.summary);
        let title_clean = derive_title(&entry.title, &summary_clean);

        // Detect on the combined text; a declining detector means English.
        let combined = format!("{title_clean} {summary_clean}");
        let lang = self
            .translator
            .detect(&combined)
            .await
            .unwrap_or_else(|| "en".to_string());

        let (title_en, summary_en) = if lang == "en" {
            (title_clean.clone(), summary_clean.clone())
        } else {
            let t = self
                .translator
                .translate_to_english(&title_clean)
                .await
                .unwrap_or_else(|| title_clean.clone());
            let s = if summary_clean.is_empty() {
                summary_clean.clone()
            } else {
                self.translator
                    .translate_to_english(&summary_clean)
                    .await
                    .unwrap_or_else(|| summary_clean.clone())
            };
            (t, s)
        };

        // Classification and matching both run on the English rendition.
        let filter_text = format!("{title_en} {summary_en}");
        let relevance = self.terms.classify(&filter_text);
        if relevance.excluded {
            tracing::debug!(url, "entry excluded by watch terms");
            return None;
        }

        let published_at = resolve_publish_time(entry);

        let src_dom = domain_of(&url);
        if is_blocked(&src_dom) {
            return None;
        }
        let source = clean_source_name(feed_title, &url);

        let mut tags: BTreeSet<String> = relevance.tags.into_iter().collect();
        let mut geo = Geo::default();
        if let Some(hit) = self.matcher.resolve(&filter_text) {
            if let Some(iata) = &hit.iata {
                tags.insert(iata.clone());
            }
            if let Some(country) = &hit.country {
                tags.insert(country.clone());
            }
            geo = hit.into();
        }

        // The single relevance gate: location tags never satisfy it.
        if !tags.contains(TAG_AIRPORT_SECURITY) && !tags.contains(TAG_DIPLOMATIC) {
            return None;
        }

        let category = classify_source(declared, &src_dom);
        let id = short_hash(if url.is_empty() { &title_en } else { &url });

        Some(NormalizedItem {
            id,
            title_orig: title_clean,
            summary_orig: summary_clean,
            lang,
            title: title_en.clone(),
            summary: summary_en.clone(),
            title_en,
            summary_en,
            url,
            source,
            published_at,
            tags: tags.into_iter().collect(),
            category,
            geo,
        })
    }
}

/// Decode entities and strip tags, keeping line structure so the
/// first-line title fallback still has lines to pick from.
pub fn strip_html(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut out = html_escape::decode_html_entities(raw).to_string();

    static RE_BREAKS: OnceCell<Regex> = OnceCell::new();
    let re_breaks =
        RE_BREAKS.get_or_init(|| Regex::new(r"(?is)<br\s*/?>|</p\s*>|</div\s*>|</li\s*>").unwrap());
    out = re_breaks.replace_all(&out, "\n").to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // Collapse runs of spaces/tabs but leave newlines alone.
    static RE_SPACES: OnceCell<Regex> = OnceCell::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"[^\S\n]+").unwrap());
    out = re_spaces.replace_all(&out, " ").to_string();

    out.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Title derivation: the stripped raw title unless empty or the literal
/// placeholder, else the first non-blank summary line (160-char cap),
/// else the placeholder itself.
pub fn derive_title(raw_title: &str, summary_clean: &str) -> String {
    let t = strip_html(raw_title);
    let t = t.trim();
    if !t.is_empty() && t.to_lowercase() != NO_TITLE {
        return t.to_string();
    }
    summary_clean
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| l.chars().take(FALLBACK_TITLE_CHARS).collect())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// First parseable of published → updated → created wins; none parseable
/// means "now". Accepts RFC 3339, RFC 2822 and two naive formats (UTC
/// assumed).
pub fn resolve_publish_time(entry: &RawEntry) -> DateTime<Utc> {
    [&entry.published, &entry.updated, &entry.created]
        .into_iter()
        .flatten()
        .find_map(|raw| parse_datetime(raw))
        .unwrap_or_else(Utc::now)
}

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(odt) = OffsetDateTime::parse(s, &Rfc2822) {
        return DateTime::<Utc>::from_timestamp(odt.unix_timestamp(), 0);
    }
    // Obsolete RFC 2822 zone names ("GMT", "EST") that the strict parser
    // above rejects.
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Stable 16-hex-char identity, SHA-256 truncated.
pub fn short_hash(s: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(s.as_bytes());
    let mut out = String::with_capacity(16);
    for b in digest.iter().take(8) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
