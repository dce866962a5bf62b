//! nStream JSON listings
//!
//! ```json
//! {
//!   "categories": [{ "category_id": 1, "category_title": "News" }],
//!   "channels": [{ "title": "News 24", "stream_url": "http://...", "logo": "http://...", "category_id": "1,2" }]
//! }
//! ```
//!
//! Providers are inconsistent about identifier types, so ids may be strings
//! or numbers.

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::errors::{SourceError, SourceResult};
use crate::models::{CategoryIndex, ChannelListing, ChannelRecord};
use crate::pipeline::traits::TransformInput;

use super::{decode_text, SourceAdapter, SourceFormat};

#[derive(Debug, Deserialize)]
struct NstreamDocument {
    #[serde(default)]
    channels: Vec<NstreamChannel>,
    #[serde(default)]
    categories: Vec<NstreamCategory>,
}

#[derive(Debug, Deserialize)]
struct NstreamChannel {
    #[serde(default)]
    title: String,
    #[serde(default)]
    stream_url: Option<String>,
    #[serde(default)]
    playlist_url: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NstreamCategory {
    #[serde(deserialize_with = "required_id")]
    category_id: String,
    #[serde(default)]
    category_title: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<IdValue> for String {
    fn from(value: IdValue) -> Self {
        match value {
            IdValue::Text(text) => text,
            IdValue::Number(number) => number.to_string(),
        }
    }
}

fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdValue>::deserialize(deserializer)?.map(String::from))
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(IdValue::deserialize(deserializer)?.into())
}

/// First non-empty of `stream_url` and `playlist_url`
pub(crate) fn pick_stream_url(stream_url: Option<String>, playlist_url: Option<String>) -> String {
    stream_url
        .filter(|url| !url.trim().is_empty())
        .or(playlist_url.filter(|url| !url.trim().is_empty()))
        .unwrap_or_default()
}

pub struct NstreamJsonAdapter;

impl NstreamJsonAdapter {
    pub fn parse(text: &str) -> SourceResult<ChannelListing> {
        let document: NstreamDocument = serde_json::from_str(text)
            .map_err(|e| {
                SourceError::parse(SourceFormat::NstreamJson.to_string(), e.to_string())
            })?;

        let categories: CategoryIndex = document
            .categories
            .into_iter()
            .map(|category| (category.category_id, category.category_title))
            .collect();

        let channels: Vec<ChannelRecord> = document
            .channels
            .into_iter()
            .map(|channel| {
                ChannelRecord::new(
                    channel.title,
                    pick_stream_url(channel.stream_url, channel.playlist_url),
                )
                .with_logo(channel.logo.unwrap_or_default())
                .with_category_list(channel.category_id.as_deref().unwrap_or_default())
            })
            .collect();

        debug!(
            "Parsed nStream JSON listing: channels={} categories={}",
            channels.len(),
            categories.len()
        );
        Ok(ChannelListing::new(channels, categories))
    }
}

impl SourceAdapter for NstreamJsonAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::NstreamJson
    }

    fn adapt(&self, bytes: &[u8]) -> SourceResult<TransformInput> {
        Ok(TransformInput::Listing(Self::parse(&decode_text(bytes)?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let listing = NstreamJsonAdapter::parse(
            r#"{
                "categories": [
                    {"category_id": 1, "category_title": "News"},
                    {"category_id": "2", "category_title": "Sport"}
                ],
                "channels": [
                    {"title": "News 24", "stream_url": "http://s/1", "logo": "http://l/1.png", "category_id": "1,2"},
                    {"title": "Backup", "stream_url": "", "playlist_url": "http://p/2", "category_id": 2},
                    {"title": "Empty", "category_id": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(listing.categories.resolve("1"), Some("News"));
        assert_eq!(listing.categories.resolve("2"), Some("Sport"));
        assert_eq!(listing.channels.len(), 3);
        assert_eq!(listing.channels[0].category_ids, vec!["1", "2"]);
        assert_eq!(listing.channels[0].logo_url.as_deref(), Some("http://l/1.png"));
        assert_eq!(listing.channels[1].stream_url, "http://p/2");
        assert_eq!(listing.channels[1].category_ids, vec!["2"]);
        assert!(!listing.channels[2].has_stream());
        assert_eq!(listing.default_max_group_titles, None);
    }

    #[test]
    fn test_malformed_payload() {
        let err = NstreamJsonAdapter::parse("{\"channels\": 3}").unwrap_err();
        assert!(matches!(err, SourceError::Parse { format, .. } if format == "nstream-json"));
    }
}
