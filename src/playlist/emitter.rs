//! M3U8 playlist emitter
//!
//! Serializes channel records or parsed entries into playlist text. Entries
//! without a playable stream URL are skipped silently: upstream listings
//! routinely contain placeholder channels.

use tracing::debug;

use super::extinf::{sanitize_attribute_value, EXTINF_PREFIX};
use super::parser::{PlaylistEntry, EXTM3U_HEADER};
use crate::models::ChannelRecord;

/// Accumulates playlist text in an explicit buffer
#[derive(Debug)]
pub struct PlaylistEmitter {
    header: String,
    body: String,
    written: usize,
    skipped: usize,
}

impl Default for PlaylistEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistEmitter {
    pub fn new() -> Self {
        Self {
            header: EXTM3U_HEADER.to_string(),
            body: String::new(),
            written: 0,
            skipped: 0,
        }
    }

    /// Use an existing `#EXTM3U` line (keeps header attributes such as `url-tvg`)
    pub fn with_header(mut self, header: Option<&str>) -> Self {
        if let Some(header) = header.filter(|h| h.starts_with(EXTM3U_HEADER)) {
            self.header = header.to_string();
        }
        self
    }

    /// Emit a structured record as
    /// `#EXTINF:0[ tvg-logo="..."][ group-title="..."],<title>` + URL.
    /// Returns `false` when the record was skipped.
    pub fn push_record(&mut self, record: &ChannelRecord, group_title: Option<&str>) -> bool {
        if !record.has_stream() {
            self.skip(&record.title);
            return false;
        }

        self.body.push_str(EXTINF_PREFIX);
        self.body.push('0');
        if let Some(logo) = record.logo_url.as_deref().filter(|l| !l.is_empty()) {
            self.body
                .push_str(&format!(" tvg-logo=\"{}\"", sanitize_attribute_value(logo)));
        }
        if let Some(group) = group_title.filter(|g| !g.is_empty()) {
            self.body
                .push_str(&format!(" group-title=\"{}\"", sanitize_attribute_value(group)));
        }
        self.body.push(',');
        self.body.push_str(&single_line(&record.title));
        self.body.push('\n');
        self.body.push_str(record.stream_url.trim());
        self.body.push('\n');

        self.written += 1;
        true
    }

    /// Emit a parsed entry with its `#EXTINF` line and trailing lines verbatim.
    /// Returns `false` when the entry has no stream URL and was skipped.
    pub fn push_entry(&mut self, entry: &PlaylistEntry) -> bool {
        if entry.stream_url().is_none() {
            self.skip(entry.title());
            return false;
        }

        self.body.push_str(&entry.extinf.render());
        self.body.push('\n');
        for line in &entry.lines {
            self.body.push_str(line);
            self.body.push('\n');
        }

        self.written += 1;
        true
    }

    fn skip(&mut self, title: &str) {
        debug!("Skipping channel '{}' without stream URL", title);
        self.skipped += 1;
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> String {
        let mut output = String::with_capacity(self.header.len() + 1 + self.body.len());
        output.push_str(&self.header);
        output.push('\n');
        output.push_str(&self.body);
        output
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}
