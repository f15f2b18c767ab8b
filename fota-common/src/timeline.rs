//! Contact log and posted updates interleaved into one timeline.

use serde::{Deserialize, Serialize};

use crate::temporal::parse_timestamp;
use crate::types::{NormalizedContact, NormalizedPost};

/// One timeline row. `ts` is the timestamp the row is ordered by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineItem {
    Contact { ts: String, data: NormalizedContact },
    Post { ts: String, data: NormalizedPost },
}

impl TimelineItem {
    pub fn ts(&self) -> &str {
        match self {
            TimelineItem::Contact { ts, .. } | TimelineItem::Post { ts, .. } => ts,
        }
    }

    /// Stable identity for list rendering: `c-<id>` / `p-<id>`, falling back
    /// to the row position when the record has no id.
    pub fn track_key(&self, index: usize) -> String {
        let (prefix, id) = match self {
            TimelineItem::Contact { data, .. } => ("c", data.id.as_deref()),
            TimelineItem::Post { data, .. } => ("p", data.id.as_deref()),
        };
        match id {
            Some(id) => format!("{}-{}", prefix, id),
            None => format!("{}-{}", prefix, index),
        }
    }
}

/// Merge contacts and posts newest first.
///
/// Rows whose timestamp is absent or unparseable are dropped rather than
/// shown at 1970. The sort is stable: rows with equal timestamps keep their
/// input order, contacts before posts.
pub fn merge(contacts: Vec<NormalizedContact>, posts: Vec<NormalizedPost>) -> Vec<TimelineItem> {
    let contact_items = contacts.into_iter().filter_map(|contact| {
        let ts = contact.time.clone()?;
        Some(TimelineItem::Contact { ts, data: contact })
    });
    let post_items = posts.into_iter().filter_map(|post| {
        let ts = post.created_at.clone()?;
        Some(TimelineItem::Post { ts, data: post })
    });

    let mut keyed: Vec<(i64, TimelineItem)> = contact_items
        .chain(post_items)
        .filter_map(|item| {
            let parsed = parse_timestamp(Some(item.ts()));
            parsed.valid.then_some((parsed.epoch_millis, item))
        })
        .collect();

    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, time: &str) -> NormalizedContact {
        NormalizedContact {
            id: Some(id.to_string()),
            time: Some(time.to_string()),
            ..Default::default()
        }
    }

    fn post(id: &str, created_at: &str) -> NormalizedPost {
        NormalizedPost {
            id: Some(id.to_string()),
            created_at: Some(created_at.to_string()),
            ..Default::default()
        }
    }

    fn keys(items: &[TimelineItem]) -> Vec<String> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| item.track_key(i))
            .collect()
    }

    #[test]
    fn test_newer_contact_first() {
        let merged = merge(
            vec![contact("1", "2024-01-02T00:00:00Z")],
            vec![post("1", "2024-01-01T00:00:00Z")],
        );
        assert_eq!(keys(&merged), vec!["c-1", "p-1"]);
    }

    #[test]
    fn test_empty_timestamp_excluded() {
        assert!(merge(vec![contact("1", "")], vec![]).is_empty());

        let no_time = NormalizedContact::default();
        assert!(merge(vec![no_time], vec![post("2", "nonsense")]).is_empty());
    }

    #[test]
    fn test_interleaves_both_sources() {
        let merged = merge(
            vec![
                contact("1", "2024-01-01T10:00:00Z"),
                contact("2", "2024-01-01T12:00:00Z"),
            ],
            vec![post("1", "2024-01-01T11:00:00Z")],
        );
        assert_eq!(keys(&merged), vec!["c-2", "p-1", "c-1"]);
    }

    #[test]
    fn test_stable_for_equal_timestamps() {
        let ts = "2024-01-01T10:00:00Z";
        let merged = merge(
            vec![contact("a", ts), contact("b", ts)],
            vec![post("c", ts)],
        );
        assert_eq!(keys(&merged), vec!["c-a", "c-b", "p-c"]);
    }

    #[test]
    fn test_idempotent_on_sorted_input() {
        let first = merge(
            vec![
                contact("1", "2024-01-03T00:00:00Z"),
                contact("2", "2024-01-01T00:00:00Z"),
            ],
            vec![post("1", "2024-01-02T00:00:00Z")],
        );

        let (contacts, posts): (Vec<_>, Vec<_>) =
            first.iter().cloned().partition(|item| matches!(item, TimelineItem::Contact { .. }));
        let contacts = contacts
            .into_iter()
            .filter_map(|item| match item {
                TimelineItem::Contact { data, .. } => Some(data),
                TimelineItem::Post { .. } => None,
            })
            .collect();
        let posts = posts
            .into_iter()
            .filter_map(|item| match item {
                TimelineItem::Post { data, .. } => Some(data),
                TimelineItem::Contact { .. } => None,
            })
            .collect();

        assert_eq!(merge(contacts, posts), first);
    }

    #[test]
    fn test_track_key_falls_back_to_index() {
        let item = TimelineItem::Post {
            ts: "2024-01-01T00:00:00Z".to_string(),
            data: NormalizedPost::default(),
        };
        assert_eq!(item.track_key(4), "p-4");
    }

    #[test]
    fn test_serialized_shape() {
        let merged = merge(vec![contact("1", "2024-01-02T00:00:00Z")], vec![]);
        let value = serde_json::to_value(&merged[0]).unwrap();
        assert_eq!(value["kind"], "contact");
        assert_eq!(value["ts"], "2024-01-02T00:00:00Z");
        assert_eq!(value["data"]["id"], "1");
    }
}
