// src/geomatch.rs
//! # Geo matcher
//!
//! Resolves free text to a single airport, precision-first. Two passes:
//!
//! 1. Full aliases (anything that is not a bare 3-letter code), whole-word,
//!    case-insensitive. A hit counts only if the alias itself contains
//!    "airport" or an airport-context word appears within ±48 characters
//!    of the match.
//! 2. Standalone 3-uppercase-letter tokens looked up as IATA codes, again
//!    requiring nearby airport context.
//!
//! The word boundary plus context window combination is the core
//! anti-false-positive rule: "IST" inside "first" never matches, and a bare
//! city name without aviation context never geotags an item.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::airports::{AirportMeta, AirportRegistry};

/// Characters searched on each side of a hit for a context marker.
pub const CONTEXT_WINDOW: usize = 48;

/// Result of resolving text to an airport.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatch {
    pub iata: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

fn context_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(airport|intl|international|terminal|airfield|aerodrome)s?\b").unwrap()
    })
}

fn code_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]{3}\b").unwrap())
}

/// True if an airport-context marker occurs within `CONTEXT_WINDOW`
/// characters on either side of byte position `pos`.
fn has_airport_context(text: &str, pos: usize) -> bool {
    let start = text[..pos]
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let end = text[pos..]
        .char_indices()
        .nth(CONTEXT_WINDOW)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len());
    context_re().is_match(&text[start..end])
}

struct CompiledAlias {
    alias: String,
    re: Regex,
    meta: AirportMeta,
}

/// Immutable matcher; compiled once from the registry, safe to share.
pub struct GeoMatcher {
    full_aliases: Vec<CompiledAlias>,
    registry: AirportRegistry,
}

impl GeoMatcher {
    pub fn new(registry: AirportRegistry) -> Self {
        let mut full_aliases = Vec::new();
        for (alias, meta) in registry.aliases() {
            // Bare 3-letter codes are handled by the second pass.
            if alias.len() == 3 && alias.chars().all(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            let pattern = format!(r"(?i)\b{}\b", regex::escape(alias));
            match Regex::new(&pattern) {
                Ok(re) => full_aliases.push(CompiledAlias {
                    alias: alias.clone(),
                    re,
                    meta: meta.clone(),
                }),
                Err(e) => {
                    tracing::warn!(alias = %alias, error = %e, "skipping uncompilable alias")
                }
            }
        }
        Self {
            full_aliases,
            registry,
        }
    }

    /// Resolve free text to at most one airport. First contextual hit wins;
    /// aliases are tried longest-first, so ties at the same position go to
    /// the more specific alias.
    pub fn resolve(&self, text: &str) -> Option<LocationMatch> {
        if text.trim().is_empty() {
            return None;
        }

        // Pass 1: full aliases.
        for ca in &self.full_aliases {
            for m in ca.re.find_iter(text) {
                if ca.alias.contains("airport") || has_airport_context(text, m.start()) {
                    return Some(self.from_meta(&ca.meta));
                }
            }
        }

        // Pass 2: standalone IATA tokens. Scan an uppercased copy so casing
        // in the source text does not matter; word boundaries still hold.
        let upper = text.to_uppercase();
        for m in code_re().find_iter(&upper) {
            let token = m.as_str();
            if self.registry.has_code(token) && has_airport_context(&upper, m.start()) {
                let (lat, lon) = self.registry.coords_for(token)?;
                let meta = self.registry.meta_for_code(token);
                return Some(LocationMatch {
                    iata: Some(token.to_string()),
                    name: meta.and_then(|m| m.name.clone()),
                    city: meta.and_then(|m| m.city.clone()),
                    country: meta.and_then(|m| m.country.clone()),
                    lat: Some(lat),
                    lon: Some(lon),
                });
            }
        }

        None
    }

    fn from_meta(&self, meta: &AirportMeta) -> LocationMatch {
        let mut lat = meta.lat;
        let mut lon = meta.lon;
        // Alias record without coordinates: fall back to the code map.
        if lat.is_none() || lon.is_none() {
            if let Some(code) = &meta.iata {
                if let Some((la, lo)) = self.registry.coords_for(code) {
                    lat = Some(la);
                    lon = Some(lo);
                }
            }
        }
        LocationMatch {
            iata: meta.iata.clone(),
            name: meta.name.clone(),
            city: meta.city.clone(),
            country: meta.country.clone(),
            lat,
            lon,
        }
    }
}
