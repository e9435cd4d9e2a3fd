// src/translate.rs
//! Best-effort language detection and translation. `None` from either
//! operation means "service declined or failed"; callers substitute the
//! input unchanged. Programming errors never hide in a `None`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Translation input beyond this is truncated; the public endpoint
/// rejects oversized queries.
const MAX_INPUT_CHARS: usize = 4500;

pub const ENV_TRANSLATOR: &str = "TRANSLATOR";

#[async_trait]
pub trait Translator: Send + Sync {
    /// ISO 639-1 language code of the text, if the service can tell.
    async fn detect(&self, text: &str) -> Option<String>;
    /// English rendition of the text, if the service produced one.
    async fn translate_to_english(&self, text: &str) -> Option<String>;
    fn name(&self) -> &'static str;
}

/// Always declines. With this installed every item passes through
/// untranslated and is treated as English.
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn detect(&self, _text: &str) -> Option<String> {
        None
    }
    async fn translate_to_english(&self, _text: &str) -> Option<String> {
        None
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// The public `translate.googleapis.com/translate_a/single` endpoint.
/// Responses are positional JSON arrays: segment pairs at index 0,
/// detected language at index 2.
pub struct GoogleTranslator {
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gsa-collector/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(25))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    async fn call(&self, text: &str) -> Option<Value> {
        let q: String = text.chars().take(MAX_INPUT_CHARS).collect();
        let resp = self
            .client
            .get("https://translate.googleapis.com/translate_a/single")
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", "en"),
                ("dt", "t"),
                ("q", q.as_str()),
            ])
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;
        let value = resp.json::<Value>().await.ok()?;
        Some(value)
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn detect(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let value = self.call(text).await?;
        let lang = value.get(2)?.as_str()?;
        if lang.is_empty() {
            return None;
        }
        Some(lang.to_string())
    }

    async fn translate_to_english(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let value = self.call(text).await?;
        let segments = value.get(0)?.as_array()?;
        let mut out = String::new();
        for seg in segments {
            if let Some(piece) = seg.get(0).and_then(|p| p.as_str()) {
                out.push_str(piece);
            }
        }
        if out.trim().is_empty() {
            tracing::debug!("translation returned no segments");
            return None;
        }
        Some(out)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Pick a translator from `TRANSLATOR` (`google` is the default,
/// `off`/`disabled` turns translation off).
pub fn from_env() -> Box<dyn Translator> {
    match std::env::var(ENV_TRANSLATOR)
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "off" | "disabled" | "none" => Box::new(DisabledTranslator),
        _ => Box::new(GoogleTranslator::new()),
    }
}
