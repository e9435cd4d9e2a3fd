// src/ingest/types.rs
//! Shapes shared between feed parsing and normalization.

/// One raw entry as it came out of an RSS/Atom document. Every field is
/// best-effort; missing values are empty strings / `None` and the
/// normalizer degrades accordingly.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub id: String,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub created: Option<String>,
}

impl RawEntry {
    /// Canonical URL for the entry: the link, falling back to the id
    /// (Atom ids are frequently the permalink).
    pub fn url(&self) -> &str {
        if !self.link.is_empty() {
            &self.link
        } else {
            &self.id
        }
    }
}
