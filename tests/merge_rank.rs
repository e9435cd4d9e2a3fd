// tests/merge_rank.rs
// Dedup-and-rank behavior over normalized items, including the
// same-URL-different-timestamp case from the normalizer onward.

use gsa_collector::geomatch::GeoMatcher;
use gsa_collector::ingest::types::RawEntry;
use gsa_collector::merge::{merge_and_rank, PublishedCollection, MAX_ITEMS};
use gsa_collector::normalize::Normalizer;
use gsa_collector::relevance::WatchTerms;
use gsa_collector::sources::FeedKind;
use gsa_collector::translate::DisabledTranslator;
use gsa_collector::AirportRegistry;

fn normalizer() -> Normalizer {
    Normalizer::new(
        GeoMatcher::new(AirportRegistry::default()),
        WatchTerms::new(vec!["fire".into()], vec![], vec![]),
        Box::new(DisabledTranslator),
    )
}

fn entry(link: &str, published: &str) -> RawEntry {
    RawEntry {
        title: "Fire reported at the depot".to_string(),
        link: link.to_string(),
        published: Some(published.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn same_url_keeps_the_newer_version() {
    let n = normalizer();
    let older = n
        .normalize(
            &entry("https://example.com/story", "2024-01-01T10:00:00Z"),
            "Wire",
            FeedKind::News,
        )
        .await
        .unwrap();
    let newer = n
        .normalize(
            &entry("https://example.com/story", "2024-01-01T12:00:00Z"),
            "Wire",
            FeedKind::News,
        )
        .await
        .unwrap();
    assert_eq!(older.id, newer.id);

    let merged = merge_and_rank(vec![older, newer]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].published_at.to_rfc3339(), "2024-01-01T12:00:00+00:00");
}

#[tokio::test]
async fn collection_is_sorted_and_capped() {
    let n = normalizer();
    let mut items = Vec::new();
    for i in 0..(MAX_ITEMS + 20) {
        let day = 1 + (i % 27);
        let it = n
            .normalize(
                &entry(
                    &format!("https://example.com/{i}"),
                    &format!("2024-01-{day:02}T10:00:00Z"),
                ),
                "Wire",
                FeedKind::News,
            )
            .await
            .unwrap();
        items.push(it);
    }

    let collection = PublishedCollection::new(items);
    assert_eq!(collection.items.len(), MAX_ITEMS);
    for pair in collection.items.windows(2) {
        assert!(pair[0].published_at >= pair[1].published_at);
        if pair[0].published_at == pair[1].published_at {
            assert!(pair[0].id < pair[1].id);
        }
    }
}
