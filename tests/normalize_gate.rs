// tests/normalize_gate.rs
// The normalizer's per-entry contract: exclusion short-circuit, the
// relevance gate, geo/tag enrichment, and translation fallbacks.

use async_trait::async_trait;
use gsa_collector::airports::{AirportRecord, AirportRegistry};
use gsa_collector::geomatch::GeoMatcher;
use gsa_collector::ingest::types::RawEntry;
use gsa_collector::normalize::Normalizer;
use gsa_collector::relevance::WatchTerms;
use gsa_collector::sources::{FeedKind, SourceCategory};
use gsa_collector::translate::{DisabledTranslator, Translator};

fn registry() -> AirportRegistry {
    let records: Vec<AirportRecord> = serde_json::from_str(
        r#"[
            {"iata": "IST", "name": "Istanbul Airport", "city": "Istanbul",
             "country": "Turkey", "lat": 40.98, "lon": 28.81,
             "aliases": ["Istanbul Airport"]},
            {"iata": "FRA", "name": "Frankfurt Airport", "city": "Frankfurt",
             "country": "Germany", "lat": 50.03, "lon": 8.56,
             "aliases": ["Frankfurt Airport", "Flughafen Frankfurt"]}
        ]"#,
    )
    .unwrap();
    AirportRegistry::from_records(records)
}

fn terms() -> WatchTerms {
    WatchTerms::new(
        vec!["fire".into(), "security alert".into(), "evacuat".into()],
        vec!["ambassador".into(), "embassy".into()],
        vec!["horoscope".into()],
    )
}

fn normalizer() -> Normalizer {
    Normalizer::new(GeoMatcher::new(registry()), terms(), Box::new(DisabledTranslator))
}

/// Pretends everything is German and translates two known phrases.
struct MockGerman;

#[async_trait]
impl Translator for MockGerman {
    async fn detect(&self, _text: &str) -> Option<String> {
        Some("de".to_string())
    }
    async fn translate_to_english(&self, text: &str) -> Option<String> {
        match text {
            "Brand am Flughafen Frankfurt" => Some("Fire at Frankfurt Airport".to_string()),
            "Terminal geraeumt" => Some("Terminal evacuated".to_string()),
            _ => None,
        }
    }
    fn name(&self) -> &'static str {
        "mock-de"
    }
}

fn entry(title: &str, summary: &str, link: &str, published: &str) -> RawEntry {
    RawEntry {
        title: title.to_string(),
        summary: summary.to_string(),
        link: link.to_string(),
        published: (!published.is_empty()).then(|| published.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn istanbul_fire_end_to_end() {
    let n = normalizer();
    let e = entry(
        "Fire breaks out near Istanbul Airport terminal",
        "",
        "https://example-wire.com/articles/ist-fire",
        "2024-01-01T10:00:00Z",
    );
    let item = n.normalize(&e, "Example Wire", FeedKind::News).await.unwrap();

    assert!(item.tags.iter().any(|t| t == "airport/security"));
    assert!(item.tags.iter().any(|t| t == "IST"));
    assert!(item.tags.iter().any(|t| t == "Turkey"));
    assert_eq!(item.geo.iata.as_deref(), Some("IST"));
    assert_eq!(item.geo.airport.as_deref(), Some("Istanbul Airport"));
    assert_eq!(item.geo.lat, Some(40.98));
    assert_eq!(item.geo.lon, Some(28.81));
    assert_eq!(item.category, SourceCategory::LocalNews);
    assert_eq!(item.published_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");
    assert_eq!(item.lang, "en");
    assert_eq!(item.source, "Example Wire");
}

#[tokio::test]
async fn irrelevant_item_is_rejected() {
    let n = normalizer();
    let e = entry(
        "Celebrity spotted at Heathrow shopping",
        "",
        "https://example-wire.com/articles/celebrity",
        "",
    );
    assert!(n.normalize(&e, "Example Wire", FeedKind::News).await.is_none());
}

#[tokio::test]
async fn location_tags_alone_never_pass_the_gate() {
    let n = normalizer();
    // Geo would resolve (alias contains "airport"), but no core or
    // diplomacy term matches.
    let e = entry(
        "Istanbul Airport opens a new lounge",
        "",
        "https://example-wire.com/articles/lounge",
        "",
    );
    assert!(n.normalize(&e, "Example Wire", FeedKind::News).await.is_none());
}

#[tokio::test]
async fn exclusion_beats_core_terms() {
    let n = normalizer();
    let e = entry(
        "Fire sign horoscope: a turbulent week ahead",
        "",
        "https://example-wire.com/articles/astrology",
        "",
    );
    assert!(n.normalize(&e, "Example Wire", FeedKind::News).await.is_none());
}

#[tokio::test]
async fn declared_social_feed_categorizes_social() {
    let n = normalizer();
    let e = entry(
        "Fire near Istanbul Airport terminal, video",
        "",
        "https://social.example/post/1",
        "",
    );
    let item = n.normalize(&e, "", FeedKind::Social).await.unwrap();
    assert_eq!(item.category, SourceCategory::Social);
    // Blank feed title falls back to the domain.
    assert_eq!(item.source, "social.example");
}

#[tokio::test]
async fn major_domain_categorizes_major_news() {
    let n = normalizer();
    let e = entry(
        "Security alert at Frankfurt Airport",
        "",
        "https://www.bbc.co.uk/news/1",
        "",
    );
    let item = n.normalize(&e, "BBC News", FeedKind::News).await.unwrap();
    assert_eq!(item.category, SourceCategory::MajorNews);
}

#[tokio::test]
async fn blocked_domain_is_dropped() {
    let n = normalizer();
    let e = entry(
        "Fire at Istanbul Airport",
        "",
        "https://www.bigorre.org/x",
        "",
    );
    assert!(n.normalize(&e, "Spam", FeedKind::News).await.is_none());
}

#[tokio::test]
async fn translation_path_keeps_originals_side_by_side() {
    let n = Normalizer::new(GeoMatcher::new(registry()), terms(), Box::new(MockGerman));
    let e = entry(
        "Brand am Flughafen Frankfurt",
        "Terminal geraeumt",
        "https://nachrichten.example/a/1",
        "2024-03-05T07:00:00Z",
    );
    let item = n.normalize(&e, "Nachrichten", FeedKind::News).await.unwrap();

    assert_eq!(item.lang, "de");
    assert_eq!(item.title_orig, "Brand am Flughafen Frankfurt");
    assert_eq!(item.title_en, "Fire at Frankfurt Airport");
    assert_eq!(item.summary_en, "Terminal evacuated");
    assert_eq!(item.title, item.title_en);
    // Matching ran on the English text: "fire" + Frankfurt Airport.
    assert!(item.tags.iter().any(|t| t == "airport/security"));
    assert_eq!(item.geo.iata.as_deref(), Some("FRA"));
}

#[tokio::test]
async fn failed_translation_falls_back_to_original_text() {
    let n = Normalizer::new(GeoMatcher::new(registry()), terms(), Box::new(MockGerman));
    // MockGerman declines this phrase; the original text must survive and
    // still be matched (the original here contains a core term).
    let e = entry(
        "Grossbrand fire Flughafen Frankfurt airport",
        "",
        "https://nachrichten.example/a/2",
        "",
    );
    let item = n.normalize(&e, "Nachrichten", FeedKind::News).await.unwrap();
    assert_eq!(item.lang, "de");
    assert_eq!(item.title_en, item.title_orig);
}

#[tokio::test]
async fn title_falls_back_to_first_summary_line() {
    let n = normalizer();
    let e = entry(
        "",
        "<p>Evacuation under way at Istanbul Airport.</p><p>More soon.</p>",
        "https://example-wire.com/articles/evac",
        "",
    );
    let item = n.normalize(&e, "Example Wire", FeedKind::News).await.unwrap();
    assert_eq!(item.title, "Evacuation under way at Istanbul Airport.");
}

#[tokio::test]
async fn identity_is_stable_for_the_same_url() {
    let n = normalizer();
    let a = entry("Fire at Istanbul Airport", "", "https://example-wire.com/x", "");
    let b = entry(
        "Fire at Istanbul Airport, update",
        "",
        "https://example-wire.com/x",
        "",
    );
    let ia = n.normalize(&a, "W", FeedKind::News).await.unwrap();
    let ib = n.normalize(&b, "W", FeedKind::News).await.unwrap();
    assert_eq!(ia.id, ib.id);
}

#[tokio::test]
async fn missing_publish_time_defaults_to_now() {
    let n = normalizer();
    let before = chrono::Utc::now();
    let e = entry("Fire at Istanbul Airport", "", "https://example-wire.com/now", "");
    let item = n.normalize(&e, "W", FeedKind::News).await.unwrap();
    assert!(item.published_at >= before);
}
