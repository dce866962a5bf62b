//! `#EXTINF` line model
//!
//! An `#EXTINF` line has the shape
//! `#EXTINF:<duration>[ key="value"...],<display title>`.
//! The attribute block is kept verbatim so malformed attribute syntax is
//! never lost; attributes are tokenized on demand and rewritten by span.

use std::fmt;

pub const EXTINF_PREFIX: &str = "#EXTINF:";

/// Parsed `#EXTINF` metadata line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtInf {
    attribute_block: String,
    title: String,
}

/// A single `key="value"` attribute located inside the attribute block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpan {
    pub key: String,
    pub value: String,
    /// Byte range of the value inside the attribute block (quotes excluded)
    pub value_range: std::ops::Range<usize>,
    pub quoted: bool,
}

impl ExtInf {
    pub fn new(attribute_block: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            attribute_block: attribute_block.into(),
            title: title.into(),
        }
    }

    /// Parse an `#EXTINF` line. Never fails: anything unrecognised stays in
    /// the attribute block.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let content = line
            .strip_prefix(EXTINF_PREFIX)
            .or_else(|| line.strip_prefix("#EXTINF"))
            .unwrap_or(line);

        let (attribute_block, title) = split_title(content);
        Self::new(attribute_block.trim(), title.trim())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Everything between `#EXTINF:` and the title separator, verbatim
    pub fn attribute_block(&self) -> &str {
        &self.attribute_block
    }

    /// Leading duration token, `""` when the block is empty
    pub fn duration(&self) -> &str {
        self.attribute_block
            .split_whitespace()
            .next()
            .filter(|token| !token.contains('='))
            .unwrap_or("")
    }

    /// Best-effort attribute list in block order
    pub fn attributes(&self) -> Vec<AttributeSpan> {
        scan_attributes(&self.attribute_block)
    }

    /// First attribute value for `key` (ASCII case-insensitive)
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|span| span.key.eq_ignore_ascii_case(key))
            .map(|span| span.value)
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self::new(self.attribute_block.clone(), title)
    }

    /// Set `key` to `value`, replacing every existing occurrence in place or
    /// appending the attribute when absent.
    pub fn with_attribute(&self, key: &str, value: &str) -> Self {
        let value = sanitize_attribute_value(value);
        let spans: Vec<AttributeSpan> = self
            .attributes()
            .into_iter()
            .filter(|span| span.key.eq_ignore_ascii_case(key))
            .collect();

        let mut block = self.attribute_block.clone();
        if spans.is_empty() {
            if block.is_empty() {
                block.push('0');
            }
            block.push_str(&format!(" {key}=\"{value}\""));
        } else {
            // Replace back to front so earlier ranges stay valid.
            for span in spans.iter().rev() {
                let replacement = if span.quoted {
                    value.clone()
                } else {
                    format!("\"{value}\"")
                };
                block.replace_range(span.value_range.clone(), &replacement);
            }
        }

        Self::new(block, self.title.clone())
    }

    /// Render back to a single `#EXTINF:` line
    pub fn render(&self) -> String {
        format!("{EXTINF_PREFIX}{},{}", self.attribute_block, self.title)
    }
}

impl fmt::Display for ExtInf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Split `#EXTINF` content into `(attribute block, title)`.
///
/// The title follows the last `"` + `,` pair (whitespace allowed between
/// them) so commas inside quoted attribute values survive. Without a quoted
/// attribute the split falls back to the last plain comma. Content with no
/// comma at all is treated as an attribute block with an empty title.
pub fn split_title(content: &str) -> (&str, &str) {
    if let Some((block_end, title_start)) = last_quoted_separator(content) {
        return (&content[..block_end], &content[title_start..]);
    }

    match content.rfind(',') {
        Some(comma) => (&content[..comma], &content[comma + 1..]),
        None => (content, ""),
    }
}

/// Locate the last `"\s*,` sequence; returns (end of block incl. quote, start of title)
fn last_quoted_separator(content: &str) -> Option<(usize, usize)> {
    let mut found = None;
    for (quote, _) in content.match_indices('"') {
        let after_quote = &content[quote + 1..];
        let rest = after_quote.trim_start();
        if rest.starts_with(',') {
            let comma = quote + 1 + (after_quote.len() - rest.len());
            found = Some((quote + 1, comma + 1));
        }
    }
    found
}

fn scan_attributes(block: &str) -> Vec<AttributeSpan> {
    let bytes = block.as_bytes();
    let len = bytes.len();
    let mut spans = Vec::new();

    // Skip the duration token unless the block starts straight with an attribute.
    let mut pos = match block.split_whitespace().next() {
        Some(first) if !first.contains('=') => {
            let start = block.len() - block.trim_start().len();
            start + first.len()
        }
        _ => 0,
    };

    while pos < len {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        let key_start = pos;
        while pos < len && bytes[pos] != b'=' && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let key = &block[key_start..pos];

        // Bare token or empty key: tolerated and skipped.
        if pos >= len || bytes[pos] != b'=' || key.is_empty() {
            pos += 1;
            continue;
        }
        pos += 1;

        if pos < len && bytes[pos] == b'"' {
            let value_start = pos + 1;
            let value_end = block[value_start..]
                .find('"')
                .map(|offset| value_start + offset)
                .unwrap_or(len);
            spans.push(AttributeSpan {
                key: key.to_string(),
                value: block[value_start..value_end].to_string(),
                value_range: value_start..value_end,
                quoted: true,
            });
            pos = value_end + 1;
        } else {
            let value_start = pos;
            while pos < len && !bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            spans.push(AttributeSpan {
                key: key.to_string(),
                value: block[value_start..pos].to_string(),
                value_range: value_start..pos,
                quoted: false,
            });
        }
    }

    spans
}

/// Attribute values cannot carry quotes or line breaks in M3U8
pub(crate) fn sanitize_attribute_value(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => ' ',
            other => other,
        })
        .collect()
}
