//! Track-list XML (XSPF-style) listings: `<playlist><trackList><track>`
//! with `title`, `location` and `image`. No categories.

use serde::Deserialize;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};
use crate::models::{CategoryIndex, ChannelListing, ChannelRecord};
use crate::pipeline::traits::TransformInput;

use super::{decode_text, SourceAdapter, SourceFormat};

#[derive(Debug, Deserialize)]
struct TrackListDocument {
    #[serde(default, rename = "trackList")]
    track_list: TrackList,
}

#[derive(Debug, Default, Deserialize)]
struct TrackList {
    #[serde(default, rename = "track")]
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(default)]
    title: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

pub struct TrackListAdapter;

impl TrackListAdapter {
    pub fn parse(text: &str) -> SourceResult<ChannelListing> {
        let document: TrackListDocument = quick_xml::de::from_str(text)
            .map_err(|e| {
                SourceError::parse(SourceFormat::TrackListXml.to_string(), e.to_string())
            })?;

        let channels: Vec<ChannelRecord> = document
            .track_list
            .tracks
            .into_iter()
            .map(|track| {
                ChannelRecord::new(track.title.trim(), track.location.unwrap_or_default().trim())
                    .with_logo(track.image.unwrap_or_default().trim())
            })
            .collect();

        debug!("Parsed track list: tracks={}", channels.len());
        Ok(ChannelListing::new(channels, CategoryIndex::new()))
    }
}

impl SourceAdapter for TrackListAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::TrackListXml
    }

    fn adapt(&self, bytes: &[u8]) -> SourceResult<TransformInput> {
        Ok(TransformInput::Listing(Self::parse(&decode_text(bytes)?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracks() {
        let listing = TrackListAdapter::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <playlist version="1" xmlns="http://xspf.org/ns/0/">
                <trackList>
                    <track>
                        <title>Channel One</title>
                        <location>http://s/1.m3u8</location>
                        <image>http://l/1.png</image>
                    </track>
                    <track>
                        <title>No Stream</title>
                    </track>
                </trackList>
            </playlist>"#,
        )
        .unwrap();

        assert_eq!(listing.channels.len(), 2);
        assert_eq!(listing.channels[0].stream_url, "http://s/1.m3u8");
        assert_eq!(listing.channels[0].logo_url.as_deref(), Some("http://l/1.png"));
        assert!(!listing.channels[1].has_stream());
        assert!(listing.categories.is_empty());
    }
}
