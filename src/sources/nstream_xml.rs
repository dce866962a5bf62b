//! nStream XML listings
//!
//! Same fields as the JSON flavour under an `<items>` root. A listing may
//! contain a single `<channel>` or many, and categories may be interleaved
//! with channels. The channel logo lives in `<image>`.
//!
//! Listings from this provider carry one group title per channel.

use serde::Deserialize;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};
use crate::models::{CategoryIndex, ChannelListing, ChannelRecord};
use crate::pipeline::traits::TransformInput;

use super::nstream_json::pick_stream_url;
use super::{decode_text, SourceAdapter, SourceFormat};

/// Group titles kept per channel unless configuration overrides it
pub const NSTREAM_XML_MAX_GROUP_TITLES: usize = 1;

#[derive(Debug, Deserialize)]
struct Items {
    #[serde(default, rename = "channel")]
    channels: Vec<XmlChannel>,
    #[serde(default, rename = "category")]
    categories: Vec<XmlCategory>,
}

#[derive(Debug, Deserialize)]
struct XmlChannel {
    #[serde(default)]
    title: String,
    #[serde(default)]
    stream_url: Option<String>,
    #[serde(default)]
    playlist_url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlCategory {
    category_id: String,
    #[serde(default)]
    category_title: String,
}

pub struct NstreamXmlAdapter;

impl NstreamXmlAdapter {
    pub fn parse(text: &str) -> SourceResult<ChannelListing> {
        let items: Items = quick_xml::de::from_str(text)
            .map_err(|e| {
                SourceError::parse(SourceFormat::NstreamXml.to_string(), e.to_string())
            })?;

        let categories: CategoryIndex = items
            .categories
            .into_iter()
            .map(|category| (category.category_id.trim().to_string(), category.category_title))
            .collect();

        let channels: Vec<ChannelRecord> = items
            .channels
            .into_iter()
            .map(|channel| {
                ChannelRecord::new(
                    channel.title.trim(),
                    pick_stream_url(channel.stream_url, channel.playlist_url),
                )
                .with_logo(channel.image.unwrap_or_default().trim())
                .with_category_list(channel.category_id.as_deref().unwrap_or_default())
            })
            .collect();

        debug!(
            "Parsed nStream XML listing: channels={} categories={}",
            channels.len(),
            categories.len()
        );
        Ok(ChannelListing::new(channels, categories)
            .with_max_group_titles(NSTREAM_XML_MAX_GROUP_TITLES))
    }
}

impl SourceAdapter for NstreamXmlAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::NstreamXml
    }

    fn adapt(&self, bytes: &[u8]) -> SourceResult<TransformInput> {
        Ok(TransformInput::Listing(Self::parse(&decode_text(bytes)?)?))
    }
}
