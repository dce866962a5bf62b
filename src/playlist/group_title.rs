//! Group-title resolution for structured listings
//!
//! Category identifiers on a channel are looked up in the run's
//! [`CategoryIndex`]; unknown identifiers are dropped silently.

use crate::models::{CategoryIndex, ChannelRecord};

/// Separator used between multiple resolved category names
pub const GROUP_TITLE_SEPARATOR: &str = ";";

/// Resolve category identifiers to a `group-title` value.
///
/// Returns `None` when nothing resolves, in which case the attribute must be
/// omitted rather than emitted empty. `max_group_titles` caps the number of
/// resolved names kept (first ones win).
pub fn resolve_group_titles<S: AsRef<str>>(
    category_ids: &[S],
    categories: &CategoryIndex,
    max_group_titles: Option<usize>,
) -> Option<String> {
    let limit = max_group_titles.unwrap_or(usize::MAX);
    let names: Vec<&str> = category_ids
        .iter()
        .filter_map(|id| categories.resolve(id.as_ref().trim()))
        .take(limit)
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(GROUP_TITLE_SEPARATOR))
    }
}

/// Resolve a provider's comma-separated category field
pub fn resolve_group_title_list(
    category_list: &str,
    categories: &CategoryIndex,
    max_group_titles: Option<usize>,
) -> Option<String> {
    let ids: Vec<&str> = category_list.split(',').collect();
    resolve_group_titles(&ids, categories, max_group_titles)
}

/// Resolve the group title of a record
pub fn record_group_title(
    record: &ChannelRecord,
    categories: &CategoryIndex,
    max_group_titles: Option<usize>,
) -> Option<String> {
    resolve_group_titles(&record.category_ids, categories, max_group_titles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CategoryIndex {
        [("1", "News"), ("2", "General"), ("3", "Sport")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_resolves_and_joins() {
        assert_eq!(
            resolve_group_title_list("1,2", &index(), None).as_deref(),
            Some("News;General")
        );
    }

    #[test]
    fn test_caps_group_titles() {
        assert_eq!(
            resolve_group_title_list("1,2", &index(), Some(1)).as_deref(),
            Some("News")
        );
    }

    #[test]
    fn test_cap_applies_after_dropping_unknown_ids() {
        assert_eq!(
            resolve_group_title_list("9,3,1", &index(), Some(1)).as_deref(),
            Some("Sport")
        );
    }

    #[test]
    fn test_unresolvable_yields_none() {
        assert_eq!(resolve_group_title_list("7,8", &index(), None), None);
        assert_eq!(resolve_group_title_list("", &index(), None), None);
        assert_eq!(resolve_group_title_list("1", &index(), Some(0)), None);
    }

    #[test]
    fn test_record_group_title() {
        let record = ChannelRecord::new("A", "http://a").with_category_list("3, 1");
        assert_eq!(
            record_group_title(&record, &index(), None).as_deref(),
            Some("Sport;News")
        );
    }
}
