// src/lib.rs
// Public library surface for integration tests (and the collector binaries).

pub mod airports;
pub mod collector;
pub mod geomatch;
pub mod ingest;
pub mod merge;
pub mod normalize;
pub mod output;
pub mod relevance;
pub mod settings;
pub mod sources;
pub mod status;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::airports::{AirportRecord, AirportRegistry};
pub use crate::collector::Collector;
pub use crate::geomatch::{GeoMatcher, LocationMatch};
pub use crate::merge::{merge_and_rank, PublishedCollection, MAX_ITEMS};
pub use crate::normalize::{NormalizedItem, Normalizer};
pub use crate::relevance::{Relevance, WatchTerms};
pub use crate::sources::{FeedKind, SourceCategory};
pub use crate::translate::Translator;
