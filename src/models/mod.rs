//! Channel data model shared by the source adapters and the pipeline
//!
//! Records are built once per transformation run and never mutated after
//! construction; transforms produce new values instead.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single channel as delivered by a source adapter or recovered by the
/// playlist parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChannelRecord {
    pub title: String,
    pub stream_url: String,
    pub logo_url: Option<String>,
    /// Category identifiers in provider order; resolved against a [`CategoryIndex`]
    pub category_ids: Vec<String>,
    /// Any additional `key="value"` attributes carried by the source
    pub raw_attributes: BTreeMap<String, String>,
}

impl ChannelRecord {
    pub fn new(title: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            stream_url: stream_url.into(),
            ..Default::default()
        }
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        let logo_url = logo_url.into();
        self.logo_url = (!logo_url.is_empty()).then_some(logo_url);
        self
    }

    /// Attach category identifiers from a comma-separated provider field
    pub fn with_category_list(mut self, category_list: &str) -> Self {
        self.category_ids = category_list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the record has a playable stream
    pub fn has_stream(&self) -> bool {
        !self.stream_url.trim().is_empty()
    }
}

/// Lookup from category identifier to display name, built once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    names: HashMap<String, String>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category. A repeated identifier takes the later title.
    pub fn insert(&mut self, id: impl Into<String>, title: impl Into<String>) {
        self.names.insert(id.into(), title.into());
    }

    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CategoryIndex
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (id, title) in iter {
            index.insert(id, title);
        }
        index
    }
}

/// Structured payload handed to the pipeline by a source adapter
#[derive(Debug, Clone, Default)]
pub struct ChannelListing {
    pub channels: Vec<ChannelRecord>,
    pub categories: CategoryIndex,
    /// Group-title cap preferred by the adapter that produced this listing
    pub default_max_group_titles: Option<usize>,
}

impl ChannelListing {
    pub fn new(channels: Vec<ChannelRecord>, categories: CategoryIndex) -> Self {
        Self {
            channels,
            categories,
            default_max_group_titles: None,
        }
    }

    pub fn with_max_group_titles(mut self, max: usize) -> Self {
        self.default_max_group_titles = Some(max);
        self
    }
}
