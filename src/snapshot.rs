use crate::item::Item;
use crate::mode::{Mode, SortKey};
use crate::store::{Outcome, SequenceStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Order of the sequence at one point in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub mode: Mode,
    #[serde(default)]
    pub sort_key: SortKey,
    pub order: Vec<String>,
    pub taken_at_ms: i64,
}

impl OrderSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode order snapshot")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).with_context(|| "Failed to parse order snapshot JSON")
    }
}

impl SequenceStore {
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            mode: self.mode,
            sort_key: self.sort_key,
            order: self.items.iter().map(|i| i.name().to_string()).collect(),
            taken_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Re-applies a snapshot without changing membership.
    ///
    /// Names the snapshot lists come first in its order, matching duplicates
    /// in current order; unlisted items follow in their current order.
    pub fn restore(&mut self, snapshot: &OrderSnapshot) -> Outcome {
        self.sort_key = snapshot.sort_key;
        if snapshot.mode.is_sorted() {
            return self.set_mode(snapshot.mode);
        }

        let mut pending: Vec<Option<Item>> = self.items.drain(..).map(Some).collect();
        let mut ordered = Vec::with_capacity(pending.len());
        for name in &snapshot.order {
            let slot = pending
                .iter_mut()
                .find(|slot| matches!(slot, Some(item) if item.name() == name.as_str()));
            if let Some(item) = slot.and_then(Option::take) {
                ordered.push(item);
            }
        }
        ordered.extend(pending.into_iter().flatten());

        self.items = ordered;
        self.mode = snapshot.mode;
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::item::Candidate;
    use crate::store::tests::{png, store_with};

    #[test]
    fn manual_snapshot_round_trips_through_json() {
        let mut store = store_with(&["a.png", "b.png", "c.png"]);
        store.move_item(0, 2);
        let json = store.snapshot().to_json().unwrap();

        store.restore_submission_order();
        assert_eq!(store.names(), vec!["a.png", "b.png", "c.png"]);

        let snap = OrderSnapshot::from_json(&json).unwrap();
        assert_eq!(store.restore(&snap), Outcome::Applied);
        assert_eq!(store.names(), vec!["b.png", "c.png", "a.png"]);
        assert_eq!(store.mode(), Mode::Manual);
    }

    #[test]
    fn restore_keeps_membership_when_names_differ() {
        let mut store = store_with(&["x.png", "dup.png", "y.png", "dup.png"]);
        let snap = OrderSnapshot {
            mode: Mode::Numeric,
            sort_key: SortKey::Name,
            order: vec!["dup.png".into(), "gone.png".into(), "y.png".into(), "dup.png".into(), "dup.png".into()],
            taken_at_ms: 0,
        };
        store.restore(&snap);
        assert_eq!(store.names(), vec!["dup.png", "y.png", "dup.png", "x.png"]);
        let ids: Vec<u64> = store.items().iter().map(|i| i.id().0).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
        assert_eq!(store.mode(), Mode::Numeric);
    }

    #[test]
    fn sorted_snapshot_resorts_current_items() {
        let mut store = store_with(&["b.png", "c.png"]);
        store.admit(vec![png("a.png")]).unwrap();
        let snap = OrderSnapshot {
            mode: Mode::Ascending,
            sort_key: SortKey::Name,
            order: vec![],
            taken_at_ms: 0,
        };
        store.restore(&snap);
        assert_eq!(store.names(), vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn snapshot_carries_the_sort_key() {
        let mut store = SequenceStore::new(&SessionConfig::default());
        store.admit(vec![
            Candidate::from_bytes("a.png", "image/png", vec![0; 5]),
            Candidate::from_bytes("b.png", "image/png", vec![0; 1]),
        ])
        .unwrap();
        store.set_sort_key(SortKey::Size);
        let json = store.snapshot().to_json().unwrap();

        store.set_sort_key(SortKey::Name);
        store.restore(&OrderSnapshot::from_json(&json).unwrap());
        assert_eq!(store.sort_key(), SortKey::Size);
        assert_eq!(store.names(), vec!["a.png", "b.png"]);

        let legacy = OrderSnapshot::from_json(r#"{"mode":"manual","order":[],"taken_at_ms":0}"#).unwrap();
        assert_eq!(legacy.sort_key, SortKey::Name);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(OrderSnapshot::from_json("{\"mode\":\"sideways\"}").is_err());
    }
}
