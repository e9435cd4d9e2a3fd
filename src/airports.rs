// src/airports.rs
//! # Airport Registry
//!
//! Loads the airport reference list (JSON) into two immutable lookup
//! structures built once at startup:
//!
//! - alias (lowercased) → airport metadata; an airport's own IATA code is
//!   registered as an alias too,
//! - IATA code (uppercased) → coordinates, only for records that carry both
//!   a code and numeric lat/lon.
//!
//! A missing or unparseable reference file degrades to an empty registry —
//! geo enrichment then simply never matches. Never fatal.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// One airport record as shipped in `config/airports.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirportRecord {
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Metadata attached to every alias entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportMeta {
    pub iata: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Default)]
pub struct AirportRegistry {
    // Sorted by descending alias length, then lexically, so that matching
    // tries longer, more specific aliases first and ordering is stable.
    aliases: Vec<(String, AirportMeta)>,
    coords: HashMap<String, (f64, f64)>,
    by_code: HashMap<String, AirportMeta>,
}

impl AirportRegistry {
    pub fn from_records(records: Vec<AirportRecord>) -> Self {
        let mut alias_map: HashMap<String, AirportMeta> = HashMap::new();
        let mut coords = HashMap::new();
        let mut by_code = HashMap::new();

        for rec in records {
            let iata = rec
                .iata
                .as_deref()
                .map(|s| s.trim().to_ascii_uppercase())
                .filter(|s| !s.is_empty());

            let meta = AirportMeta {
                iata: iata.clone(),
                name: rec.name.clone(),
                city: rec.city.clone(),
                country: rec.country.clone(),
                lat: rec.lat,
                lon: rec.lon,
            };

            if let (Some(code), Some(lat), Some(lon)) = (&iata, rec.lat, rec.lon) {
                coords.insert(code.clone(), (lat, lon));
            }
            if let Some(code) = &iata {
                by_code.insert(code.clone(), meta.clone());
            }

            // Declared aliases plus the code itself. Later records win on
            // collision, matching the "every alias maps to exactly one
            // airport" invariant of the reference data.
            for alias in rec.aliases.iter().chain(iata.as_ref()) {
                let key = alias.trim().to_lowercase();
                if !key.is_empty() {
                    alias_map.insert(key, meta.clone());
                }
            }
        }

        let mut aliases: Vec<(String, AirportMeta)> = alias_map.into_iter().collect();
        aliases.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            aliases,
            coords,
            by_code,
        }
    }

    /// Load from a JSON file; any failure yields an empty registry.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "airports file unavailable, registry empty");
                return Self::default();
            }
        };
        match serde_json::from_str::<Vec<AirportRecord>>(&raw) {
            Ok(records) => Self::from_records(records),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "airports file unparseable, registry empty");
                Self::default()
            }
        }
    }

    pub fn aliases(&self) -> &[(String, AirportMeta)] {
        &self.aliases
    }

    pub fn coords_for(&self, code: &str) -> Option<(f64, f64)> {
        self.coords.get(code).copied()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.coords.contains_key(code)
    }

    pub fn meta_for_code(&self, code: &str) -> Option<&AirportMeta> {
        self.by_code.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
