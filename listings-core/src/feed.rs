use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::FetchError;

/// One item read from a syndication feed, before any field extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub title: String,
    pub summary: Option<String>,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub media: Vec<String>,
}

impl RawEntry {
    /// Returns `None` for items that have no usable title or link.
    pub fn from_rss_item(item: &rss::Item) -> Option<Self> {
        let title = item.title().map(str::trim).unwrap_or_default();
        let link = item.link().map(str::trim).unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            return None;
        }

        // pubDate for RSS 2.0, dc:date for the RDF flavour
        let published_at = item
            .pub_date()
            .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
            .or_else(|| {
                item.dublin_core_ext()
                    .and_then(|dc| dc.dates().first())
                    .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            })
            .map(|dt| dt.with_timezone(&Utc));

        Some(Self {
            title: title.to_owned(),
            summary: item.description().map(ToOwned::to_owned),
            link: link.to_owned(),
            published_at,
            media: media_references(item),
        })
    }
}

/// media:content first, then the standard enclosure, then `enc:enclosure`.
fn media_references(item: &rss::Item) -> Vec<String> {
    // first attribute present wins, per element
    let extension_attr = |prefix: &str, name: &str, attrs: &[&str]| -> Vec<String> {
        item.extensions()
            .get(prefix)
            .and_then(|elements| elements.get(name))
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(|ext| attrs.iter().find_map(|attr| ext.attrs().get(*attr).cloned()))
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut media = extension_attr("media", "content", &["url"]);
    if let Some(enclosure) = item.enclosure() {
        media.push(enclosure.url().to_owned());
    }
    // Craigslist writes a bare `resource`, stricter RDF uses `rdf:resource`
    media.extend(extension_attr("enc", "enclosure", &["resource", "rdf:resource"]));
    media.retain(|url| !url.is_empty());
    media
}

pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>, FetchError> {
    let channel = rss::Channel::read_from(bytes)?;
    let total = channel.items().len();
    let entries: Vec<RawEntry> = channel
        .items()
        .iter()
        .filter_map(RawEntry::from_rss_item)
        .collect();
    if entries.len() < total {
        debug!(skipped = total - entries.len(), "items without title or link");
    }
    Ok(entries)
}
