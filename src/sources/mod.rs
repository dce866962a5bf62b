//! Source Adapters
//!
//! Each provider format has an adapter that turns a raw payload into the
//! value the first pipeline step consumes: a structured
//! [`ChannelListing`](crate::models::ChannelListing) for provider listings,
//! or playlist text for M3U8 input.
//!
//! ```text
//! bytes ──► SourceFormat::detect ──► adapter_for(format).adapt(bytes) ──► TransformInput
//! ```

pub mod m3u;
pub mod nstream_json;
pub mod nstream_xml;
pub mod track_list;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};
use crate::pipeline::traits::TransformInput;

pub use m3u::M3uAdapter;
pub use nstream_json::NstreamJsonAdapter;
pub use nstream_xml::NstreamXmlAdapter;
pub use track_list::TrackListAdapter;

const UTF8_BOM: &str = "\u{feff}";

/// Input payload format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Detect from file extension, then content
    #[default]
    Auto,
    M3u8,
    NstreamJson,
    NstreamXml,
    TrackListXml,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Auto => "auto",
            SourceFormat::M3u8 => "m3u8",
            SourceFormat::NstreamJson => "nstream-json",
            SourceFormat::NstreamXml => "nstream-xml",
            SourceFormat::TrackListXml => "track-list-xml",
        };
        f.write_str(name)
    }
}

impl SourceFormat {
    /// Pick a concrete format from the file extension, falling back to
    /// sniffing the payload. `.xml` files are sniffed to tell the two XML
    /// dialects apart.
    pub fn detect(path: Option<&Path>, bytes: &[u8]) -> SourceResult<SourceFormat> {
        let extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let by_extension = match extension.as_deref() {
            Some("json") => Some(SourceFormat::NstreamJson),
            Some("m3u") | Some("m3u8") => Some(SourceFormat::M3u8),
            _ => None,
        };
        if let Some(format) = by_extension {
            debug!("Detected source format {} from file extension", format);
            return Ok(format);
        }

        let format = Self::sniff(bytes).ok_or_else(|| SourceError::UnsupportedFormat {
            format: extension.unwrap_or_else(|| "unknown".to_string()),
        })?;
        debug!("Detected source format {} from content", format);
        Ok(format)
    }

    fn sniff(bytes: &[u8]) -> Option<SourceFormat> {
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(4096)]);
        let head = head.trim_start_matches(UTF8_BOM).trim_start();

        if head.starts_with('{') || head.starts_with('[') {
            return Some(SourceFormat::NstreamJson);
        }
        if head.starts_with("#EXTM3U") || head.starts_with("#EXTINF") {
            return Some(SourceFormat::M3u8);
        }
        if head.starts_with('<') {
            if head.contains("<items") {
                return Some(SourceFormat::NstreamXml);
            }
            if head.contains("<playlist") {
                return Some(SourceFormat::TrackListXml);
            }
        }
        None
    }
}

/// Converts a raw provider payload into pipeline input
pub trait SourceAdapter: Send + Sync {
    fn format(&self) -> SourceFormat;

    fn adapt(&self, bytes: &[u8]) -> SourceResult<TransformInput>;
}

/// Adapter for a concrete format; `Auto` must be resolved with
/// [`SourceFormat::detect`] first.
pub fn adapter_for(format: SourceFormat) -> SourceResult<Box<dyn SourceAdapter>> {
    match format {
        SourceFormat::M3u8 => Ok(Box::new(M3uAdapter)),
        SourceFormat::NstreamJson => Ok(Box::new(NstreamJsonAdapter)),
        SourceFormat::NstreamXml => Ok(Box::new(NstreamXmlAdapter)),
        SourceFormat::TrackListXml => Ok(Box::new(TrackListAdapter)),
        SourceFormat::Auto => Err(SourceError::UnsupportedFormat {
            format: format.to_string(),
        }),
    }
}

/// Detect (when `format` is `Auto`) and adapt in one call
pub fn adapt(
    format: SourceFormat,
    path: Option<&Path>,
    bytes: &[u8],
) -> SourceResult<TransformInput> {
    let format = match format {
        SourceFormat::Auto => SourceFormat::detect(path, bytes)?,
        concrete => concrete,
    };
    let adapter = adapter_for(format)?;
    debug!("Adapting {} bytes as {}", bytes.len(), adapter.format());
    adapter.adapt(bytes)
}

/// Decode a payload as UTF-8 text without a leading byte-order mark
pub(crate) fn decode_text(bytes: &[u8]) -> SourceResult<String> {
    let text = String::from_utf8(bytes.to_vec())?;
    match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}
