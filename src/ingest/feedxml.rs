// src/ingest/feedxml.rs
//! RSS 2.0 / Atom parsing via quick-xml serde. Documents get an
//! HTML-entity pre-scrub first; real-world feeds embed `&nbsp;` and
//! typographic entities that are not valid XML.

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::RawEntry;

// ---------- RSS 2.0 ----------

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// <guid isPermaLink="false">…</guid> carries attributes, so a plain
// String target would not deserialize.
#[derive(Debug, Default, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

// ---------- Atom ----------

#[derive(Debug, Deserialize)]
struct AtomFeed {
    title: Option<Text>,
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct Text {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    id: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<Text>,
    content: Option<Text>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Parse a feed document, dispatching on the root element (`<rss>` vs
/// `<feed>`). Returns the feed title (if declared) and its entries.
pub fn parse_feed(body: &str) -> Result<(Option<String>, Vec<RawEntry>)> {
    let clean = scrub_html_entities_for_xml(body);

    match root_element(&clean).as_deref() {
        Some("rss") | Some("rdf") => parse_rss(&clean),
        Some("feed") => parse_atom(&clean),
        other => anyhow::bail!("document is neither RSS nor Atom (root: {other:?})"),
    }
}

fn parse_rss(clean: &str) -> Result<(Option<String>, Vec<RawEntry>)> {
    let rss: Rss = from_str(clean).context("parsing rss xml")?;
    let title = rss.channel.title.map(|t| t.trim().to_string());
    let entries = rss
        .channel
        .items
        .into_iter()
        .map(|it| RawEntry {
            title: it.title.unwrap_or_default(),
            summary: it.description.unwrap_or_default(),
            link: it.link.unwrap_or_default(),
            id: it.guid.and_then(|g| g.value).unwrap_or_default(),
            published: it.pub_date,
            updated: None,
            created: None,
        })
        .collect();
    Ok((title, entries))
}

fn parse_atom(clean: &str) -> Result<(Option<String>, Vec<RawEntry>)> {
    let atom: AtomFeed = from_str(clean).context("parsing atom xml")?;
    let title = atom.title.and_then(|t| t.value).map(|t| t.trim().to_string());
    let entries = atom
        .entries
        .into_iter()
        .map(|e| {
            let link = pick_atom_link(&e.links).unwrap_or_default();
            // Prefer <summary>, fall back to <content>.
            let summary = e
                .summary
                .and_then(|t| t.value)
                .or_else(|| e.content.and_then(|t| t.value))
                .unwrap_or_default();
            RawEntry {
                title: e.title.and_then(|t| t.value).unwrap_or_default(),
                summary,
                link,
                id: e.id.unwrap_or_default(),
                published: e.published,
                updated: e.updated,
                created: None,
            }
        })
        .collect();
    Ok((title, entries))
}

/// Local name of the first start element, lowercased (namespace prefixes
/// such as `rdf:RDF` are stripped).
fn root_element(s: &str) -> Option<String> {
    let mut reader = quick_xml::Reader::from_str(s);
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Start(e)) => {
                let name = e.name();
                let local = name.local_name();
                return Some(String::from_utf8_lossy(local.as_ref()).to_ascii_lowercase());
            }
            Ok(quick_xml::events::Event::Eof) | Err(_) => return None,
            _ => continue,
        }
    }
}

/// rel="alternate" (or no rel) wins; any href is better than none.
fn pick_atom_link(links: &[AtomLink]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .and_then(|l| l.href.clone())
        .or_else(|| links.iter().find_map(|l| l.href.clone()))
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
