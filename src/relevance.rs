// src/relevance.rs
//! Relevance classification: case-insensitive substring matching against
//! three configured term sets (core, diplomacy, exclusion). Deliberately not
//! fuzzy and not NLP — precision and explicability over recall.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const TAG_AIRPORT_SECURITY: &str = "airport/security";
pub const TAG_DIPLOMATIC: &str = "diplomatic";

/// Outcome of classifying one item's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relevance {
    /// An exclusion term matched; the item must be discarded outright.
    pub excluded: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TermsFile {
    #[serde(default)]
    core_terms: Vec<String>,
    #[serde(default)]
    diplomacy_terms: Vec<String>,
    #[serde(default)]
    exclude_terms: Vec<String>,
}

/// The three watch-term sets, lowercased at load time.
#[derive(Debug, Clone, Default)]
pub struct WatchTerms {
    core: Vec<String>,
    diplomacy: Vec<String>,
    exclude: Vec<String>,
}

impl WatchTerms {
    pub fn new(core: Vec<String>, diplomacy: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            core: lower_clean(core),
            diplomacy: lower_clean(diplomacy),
            exclude: lower_clean(exclude),
        }
    }

    /// Load from a TOML file; any failure degrades to empty term sets
    /// (nothing matches, nothing is excluded).
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "watch terms unavailable, sets empty");
                return Self::default();
            }
        };
        match toml::from_str::<TermsFile>(&raw) {
            Ok(t) => Self::new(t.core_terms, t.diplomacy_terms, t.exclude_terms),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "watch terms unparseable, sets empty");
                Self::default()
            }
        }
    }

    /// Classify text. Exclusion is checked first and short-circuits: an
    /// excluded item never receives tags.
    pub fn classify(&self, text: &str) -> Relevance {
        let t = text.to_lowercase();

        if self.exclude.iter().any(|x| t.contains(x.as_str())) {
            return Relevance {
                excluded: true,
                tags: Vec::new(),
            };
        }

        let mut tags = Vec::new();
        if self.core.iter().any(|x| t.contains(x.as_str())) {
            tags.push(TAG_AIRPORT_SECURITY.to_string());
        }
        if self.diplomacy.iter().any(|x| t.contains(x.as_str())) {
            tags.push(TAG_DIPLOMATIC.to_string());
        }
        Relevance {
            excluded: false,
            tags,
        }
    }
}

fn lower_clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
