//! Deduplication and quality-suffix priority resolution
//!
//! Collapses entries that denote the same logical channel at different
//! qualities ("News HD", "News FHD", "News 4K") into one canonical group.
//! All members are kept; the group decides the shared display name and the
//! order (best quality first) in which the members are emitted.
//!
//! Grouping works on a *hash key*: the title lowercased, run through the
//! configured normalization rules, lowercased again. Suffix matching looks
//! at every configured suffix and keeps the best (lowest index) match; only
//! that single suffix is stripped.

use regex::{NoExpand, Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::debug;

use crate::errors::{ConfigError, ConfigResult};
use crate::playlist::PlaylistEntry;

/// One hash-key substitution rule
#[derive(Debug, Clone)]
pub struct NormalizationRule {
    pattern: Regex,
    replacement: String,
    literal: bool,
}

impl NormalizationRule {
    /// Regex rule; `replacement` may use `$1`-style group references
    pub fn regex(pattern: &str, replacement: &str, case_insensitive: bool) -> ConfigResult<Self> {
        Ok(Self {
            pattern: compile(pattern, case_insensitive)?,
            replacement: replacement.to_string(),
            literal: false,
        })
    }

    /// Plain-text rule; neither side is interpreted
    pub fn literal(text: &str, replacement: &str, case_insensitive: bool) -> ConfigResult<Self> {
        Ok(Self {
            pattern: compile(&regex::escape(text), case_insensitive)?,
            replacement: replacement.to_string(),
            literal: true,
        })
    }

    fn apply(&self, input: &str) -> String {
        if self.literal {
            self.pattern
                .replace_all(input, NoExpand(&self.replacement))
                .into_owned()
        } else {
            self.pattern
                .replace_all(input, self.replacement.as_str())
                .into_owned()
        }
    }
}

fn compile(pattern: &str, case_insensitive: bool) -> ConfigResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| ConfigError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Resolver options
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub strip_suffixes: bool,
    pub suffix_priority: Vec<String>,
    pub exclusion_suffixes: Vec<String>,
    pub normalization_rules: Vec<NormalizationRule>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            strip_suffixes: crate::config::defaults::DEFAULT_STRIP_SUFFIXES,
            suffix_priority: crate::config::defaults::DEFAULT_SUFFIX_PRIORITY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclusion_suffixes: Vec::new(),
            normalization_rules: Vec::new(),
        }
    }
}

/// How a single title was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Hash key ends with an exclusion suffix; the entry is dropped
    Excluded { hash_key: String, suffix: String },
    Ranked(TitleRank),
}

/// Grouping identity and priority of a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRank {
    /// Hash key after suffix stripping; entries sharing it form a group
    pub hash_key: String,
    /// Title with the matched suffix removed (unchanged when nothing matched)
    pub stripped_name: String,
    /// Index of the matched suffix, or the suffix-list length when none matched
    pub rank: usize,
}

/// A group member with its computed rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub entry: PlaylistEntry,
    pub original_name: String,
    pub stripped_name: String,
    pub rank: usize,
}

/// Entries judged to be the same logical channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGroup {
    pub hash_key: String,
    pub canonical_name: String,
    /// Sorted by ascending rank; ties keep encounter order
    pub members: Vec<RankedEntry>,
}

impl CanonicalGroup {
    fn new(hash_key: String) -> Self {
        Self {
            hash_key,
            canonical_name: String::new(),
            members: Vec::new(),
        }
    }

    /// Members renamed to the canonical name, best quality first
    pub fn renamed_entries(&self) -> impl Iterator<Item = PlaylistEntry> + '_ {
        self.members
            .iter()
            .map(move |member| member.entry.renamed(&self.canonical_name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverReport {
    pub input_entries: usize,
    pub excluded_entries: usize,
    pub groups: usize,
}

/// Ordered result of one resolution: groups in first-appearance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPlaylist {
    pub groups: Vec<CanonicalGroup>,
    pub report: ResolverReport,
}

impl ResolvedPlaylist {
    /// Flatten into renamed entries in output order
    pub fn into_entries(self) -> Vec<PlaylistEntry> {
        self.groups
            .iter()
            .flat_map(CanonicalGroup::renamed_entries)
            .collect()
    }
}

/// Stateless resolver; every call to [`PriorityResolver::resolve`] builds its
/// own grouping table.
#[derive(Debug, Clone)]
pub struct PriorityResolver {
    strip_suffixes: bool,
    suffixes: Vec<String>,
    exclusions: Vec<String>,
    rules: Vec<NormalizationRule>,
}

impl PriorityResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            strip_suffixes: options.strip_suffixes,
            suffixes: options
                .suffix_priority
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            exclusions: options
                .exclusion_suffixes
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            rules: options.normalization_rules,
        }
    }

    /// Rank assigned to titles matching no suffix
    pub fn unranked(&self) -> usize {
        self.suffixes.len()
    }

    /// Lowercase, apply the normalization rules in order, lowercase again
    pub fn hash_key(&self, name: &str) -> String {
        let lowered = name.to_lowercase();
        let normalized = self
            .rules
            .iter()
            .fold(lowered, |acc, rule| rule.apply(&acc));
        normalized.to_lowercase()
    }

    /// Classify one display title
    pub fn classify(&self, title: &str) -> Classification {
        let hash_key = self.hash_key(title);

        if let Some(suffix) = self.exclusions.iter().find(|s| hash_key.ends_with(s.as_str())) {
            return Classification::Excluded {
                hash_key,
                suffix: suffix.clone(),
            };
        }

        // Best match across the whole list, not first match.
        let best = self
            .suffixes
            .iter()
            .enumerate()
            .filter(|(_, suffix)| hash_key.ends_with(suffix.as_str()))
            .min_by_key(|(index, _)| *index);

        match best {
            Some((rank, suffix)) => {
                let stripped_name = strip_chars(title, suffix.chars().count());
                Classification::Ranked(TitleRank {
                    hash_key: self.hash_key(&stripped_name),
                    stripped_name,
                    rank,
                })
            }
            None => Classification::Ranked(TitleRank {
                hash_key,
                stripped_name: title.to_string(),
                rank: self.unranked(),
            }),
        }
    }

    /// Group, rank and name the entries. Output order is the order in which
    /// each hash key first appeared in `entries`.
    pub fn resolve(&self, entries: Vec<PlaylistEntry>) -> ResolvedPlaylist {
        let mut report = ResolverReport {
            input_entries: entries.len(),
            ..Default::default()
        };
        let mut groups: Vec<CanonicalGroup> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let original_name = entry.title().to_string();
            let rank = match self.classify(&original_name) {
                Classification::Excluded { suffix, .. } => {
                    debug!("Excluding channel '{}' (matched '{}')", original_name, suffix);
                    report.excluded_entries += 1;
                    continue;
                }
                Classification::Ranked(rank) => rank,
            };

            let position = *positions.entry(rank.hash_key.clone()).or_insert_with(|| {
                groups.push(CanonicalGroup::new(rank.hash_key.clone()));
                groups.len() - 1
            });

            groups[position].members.push(RankedEntry {
                entry,
                original_name,
                stripped_name: rank.stripped_name,
                rank: rank.rank,
            });
        }

        for group in &mut groups {
            group.members.sort_by_key(|member| member.rank);
            if let Some(best) = group.members.first() {
                group.canonical_name = if self.strip_suffixes {
                    best.stripped_name.clone()
                } else {
                    best.original_name.clone()
                };
            }
            if group.members.len() > 1 {
                debug!(
                    "Grouped {} entries under '{}'",
                    group.members.len(),
                    group.canonical_name
                );
            }
        }

        report.groups = groups.len();
        ResolvedPlaylist { groups, report }
    }
}

/// Drop `count` trailing chars and trim
fn strip_chars(name: &str, count: usize) -> String {
    let keep = name.chars().count().saturating_sub(count);
    name.chars().take(keep).collect::<String>().trim().to_string()
}
