//! M3U8 playlist parser
//!
//! Splits raw playlist text into discrete channel entries. Each entry is an
//! `#EXTINF` line plus every line that follows it up to the next `#EXTINF`
//! (normally the stream URL, sometimes option lines such as `#EXTVLCOPT:`).

use tracing::{debug, warn};

use super::extinf::ExtInf;
use crate::errors::{PlaylistError, PlaylistResult};
use crate::models::ChannelRecord;

pub const EXTM3U_HEADER: &str = "#EXTM3U";

/// One channel entry of a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub extinf: ExtInf,
    /// Lines following the `#EXTINF` line, trimmed, blank lines removed
    pub lines: Vec<String>,
}

impl PlaylistEntry {
    pub fn new(extinf: ExtInf) -> Self {
        Self {
            extinf,
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn title(&self) -> &str {
        self.extinf.title()
    }

    /// First non-directive line, if any
    pub fn stream_url(&self) -> Option<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .find(|line| !line.starts_with('#') && !line.is_empty())
    }

    pub fn renamed(&self, title: &str) -> Self {
        Self {
            extinf: self.extinf.with_title(title),
            lines: self.lines.clone(),
        }
    }

    /// Structured view of the entry
    pub fn to_record(&self) -> ChannelRecord {
        let mut record = ChannelRecord::new(self.title(), self.stream_url().unwrap_or_default());
        for span in self.extinf.attributes() {
            if span.key.eq_ignore_ascii_case("tvg-logo") {
                record = record.with_logo(span.value.clone());
            }
            record = record.with_attribute(span.key, span.value);
        }
        record
    }
}

/// A parsed playlist: optional header line plus ordered entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// The `#EXTM3U` line as found (may carry attributes such as `url-tvg`)
    pub header: Option<String>,
    pub entries: Vec<PlaylistEntry>,
}

impl Playlist {
    /// Parse raw M3U8 text.
    ///
    /// Blank lines and surrounding whitespace are discarded. Lines before the
    /// first `#EXTINF` other than the header are dropped. Fails only when the
    /// input contains no `#EXTINF` marker.
    pub fn parse(text: &str) -> PlaylistResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut header = None;
        let mut entries: Vec<PlaylistEntry> = Vec::new();
        let mut current: Option<PlaylistEntry> = None;

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with("#EXTINF") {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                current = Some(PlaylistEntry::new(ExtInf::parse(line)));
            } else if let Some(entry) = current.as_mut() {
                entry.lines.push(line.to_string());
            } else if line.starts_with(EXTM3U_HEADER) {
                if header.is_none() {
                    header = Some(line.to_string());
                }
            } else if line.starts_with('#') {
                debug!(
                    "Dropping directive before first #EXTINF at line {}: {}",
                    line_num + 1,
                    line
                );
            } else {
                warn!(
                    "Found stream URL without EXTINF metadata at line {}: {}",
                    line_num + 1,
                    line
                );
            }
        }

        if let Some(entry) = current.take() {
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(PlaylistError::NotAPlaylist { bytes: text.len() });
        }

        debug!("Parsed {} playlist entries", entries.len());
        Ok(Self { header, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convenience wrapper returning only the entries
pub fn parse_entries(text: &str) -> PlaylistResult<Vec<PlaylistEntry>> {
    Playlist::parse(text).map(|playlist| playlist.entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#EXTM3U url-tvg=\"http://epg/guide.xml\"\n\
        \n\
        #EXTINF:-1 tvg-logo=\"http://l/bbc.png\" group-title=\"UK\",BBC One HD\n\
        #EXTVLCOPT:http-user-agent=Mozilla\n\
        http://s/bbc1hd\n\
        \n\
           #EXTINF:-1,News, Weather   \n\
          http://s/news  \n";

    #[test]
    fn test_parse_entries_and_header() {
        let playlist = Playlist::parse(SAMPLE).unwrap();
        assert_eq!(playlist.header.as_deref(), Some("#EXTM3U url-tvg=\"http://epg/guide.xml\""));
        assert_eq!(playlist.len(), 2);

        let first = &playlist.entries[0];
        assert_eq!(first.title(), "BBC One HD");
        assert_eq!(first.lines, vec!["#EXTVLCOPT:http-user-agent=Mozilla", "http://s/bbc1hd"]);
        assert_eq!(first.stream_url(), Some("http://s/bbc1hd"));

        let second = &playlist.entries[1];
        assert_eq!(second.title(), "Weather");
        assert_eq!(second.lines, vec!["http://s/news"]);
    }

    #[test]
    fn test_header_is_not_an_entry() {
        let entries = parse_entries("#EXTM3U\n#EXTINF:0,A\nhttp://a\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title(), "A");
    }

    #[test]
    fn test_missing_header_is_tolerated() {
        let playlist = Playlist::parse("#EXTINF:0,A\nhttp://a\n#EXTINF:0,B\nhttp://b").unwrap();
        assert_eq!(playlist.header, None);
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_no_extinf_is_not_a_playlist() {
        let err = Playlist::parse("#EXTM3U\nhttp://a\n").unwrap_err();
        assert_eq!(err, PlaylistError::NotAPlaylist { bytes: 17 });
        assert!(Playlist::parse("").is_err());
    }

    #[test]
    fn test_crlf_and_bom() {
        let entries = parse_entries("\u{feff}#EXTM3U\r\n#EXTINF:0,A\r\nhttp://a\r\n").unwrap();
        assert_eq!(entries[0].title(), "A");
        assert_eq!(entries[0].stream_url(), Some("http://a"));
    }

    #[test]
    fn test_entry_without_url() {
        let entries = parse_entries("#EXTINF:0,A\n#EXTINF:0,B\nhttp://b").unwrap();
        assert_eq!(entries[0].stream_url(), None);
        assert_eq!(entries[1].stream_url(), Some("http://b"));
    }

    #[test]
    fn test_to_record() {
        let entries = parse_entries(SAMPLE).unwrap();
        let record = entries[0].to_record();
        assert_eq!(record.title, "BBC One HD");
        assert_eq!(record.stream_url, "http://s/bbc1hd");
        assert_eq!(record.logo_url.as_deref(), Some("http://l/bbc.png"));
        assert_eq!(record.raw_attributes.get("group-title").map(String::as_str), Some("UK"));
    }
}
