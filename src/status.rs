// src/status.rs
//! Progress reporting for the UI: a small status file rewritten
//! atomically after every feed. Strictly best-effort; a status write that
//! fails must never fail the run.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::write_json_atomic;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorStatus {
    pub started_at: String,
    pub finished_at: String,
    pub total: usize,
    pub done: usize,
    /// Domain of the feed currently being fetched.
    pub current: String,
    pub note: String,
    pub version: String,
}

impl CollectorStatus {
    pub fn begin(total: usize) -> Self {
        Self {
            started_at: Utc::now().to_rfc3339(),
            finished_at: String::new(),
            total,
            done: 0,
            current: String::new(),
            note: "Collecting feeds...".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn finish(&mut self, note: String) {
        self.note = note;
        self.finished_at = Utc::now().to_rfc3339();
    }
}

#[derive(Debug, Clone)]
pub struct StatusWriter {
    path: PathBuf,
}

impl StatusWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write the status file; failures are logged at debug and dropped.
    pub fn write(&self, status: &CollectorStatus) {
        if let Err(e) = write_json_atomic(&self.path, status) {
            tracing::debug!(path = %self.path.display(), error = %format!("{e:#}"), "status write failed");
        }
    }
}
