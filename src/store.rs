use crate::admission::{AdmissionPolicy, AdmitError, AdmitReport};
use crate::config::SessionConfig;
use crate::item::{Candidate, Item, ItemId};
use crate::mode::{Mode, SortKey};
use crate::preview::PreviewPool;
use crate::render::{Controls, EntryView, SequenceView};
use crate::{logi, logw};

/// Result of an engine or store operation. Anything but `Applied`/`Emptied`
/// left the sequence untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Applied, and the sequence is now empty.
    Emptied,
    Ignored(Ignored),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        !matches!(self, Outcome::Ignored(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    OutOfBounds,
    Unchanged,
    NotAnInteger,
}

/// Ordered list of admitted items plus the active mode.
#[derive(Debug)]
pub struct SequenceStore {
    policy: AdmissionPolicy,
    previews: PreviewPool,
    pub(crate) items: Vec<Item>,
    pub(crate) mode: Mode,
    pub(crate) sort_key: SortKey,
    next_id: u64,
}

impl SequenceStore {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self::with_pool(
            AdmissionPolicy::from_config(cfg),
            PreviewPool::new(cfg.preview_limit),
        )
    }

    pub fn with_pool(policy: AdmissionPolicy, previews: PreviewPool) -> Self {
        Self {
            policy,
            previews,
            items: Vec::new(),
            mode: Mode::default(),
            sort_key: SortKey::default(),
            next_id: 0,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    pub fn previews(&self) -> &PreviewPool {
        &self.previews
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Item::name).collect()
    }

    /// Appends the admissible part of `candidates`, up to the item cap.
    ///
    /// In a sorted mode the sequence is re-sorted after the append.
    pub fn admit(&mut self, candidates: Vec<Candidate>) -> Result<AdmitReport, AdmitError> {
        let (accepted, rejected) = self.policy.screen(candidates);
        for r in &rejected {
            logw(format!("Rejected {r}"));
        }
        if accepted.is_empty() {
            return Err(AdmitError::NothingAdmissible { rejected });
        }

        let room = self.policy.max_items.saturating_sub(self.items.len());
        let mut accepted = accepted;
        let overflow = if accepted.len() > room {
            accepted.split_off(room)
        } else {
            Vec::new()
        };
        let truncated: Vec<String> = overflow.into_iter().map(|c| c.name).collect();
        if !truncated.is_empty() {
            logw(format!(
                "Sequence capped at {} items; dropped {} file(s)",
                self.policy.max_items,
                truncated.len()
            ));
        }

        let admitted = accepted.len();
        for candidate in accepted {
            self.next_id += 1;
            let preview = self.previews.acquire();
            if preview.is_none() {
                logw(format!("Preview pool exhausted; {} shown without preview", candidate.name));
            }
            self.items.push(Item::admit(ItemId(self.next_id), candidate, preview));
        }

        if self.mode.is_sorted() {
            self.sort_by_mode();
        }
        logi(format!("Admitted {} file(s); sequence holds {}", admitted, self.items.len()));

        Ok(AdmitReport {
            admitted,
            rejected,
            truncated,
        })
    }

    /// Empties the sequence and returns to descending mode by name. Dropping the items
    /// releases their preview handles.
    pub fn reset(&mut self) {
        let released = self.items.len();
        self.items.clear();
        self.mode = Mode::Descending;
        self.sort_key = SortKey::Name;
        logi(format!("Reset sequence ({released} file(s) released)"));
    }

    pub fn remove_at(&mut self, index: usize) -> Outcome {
        if index >= self.items.len() {
            tracing::debug!(index, len = self.items.len(), "remove ignored: out of bounds");
            return Outcome::Ignored(Ignored::OutOfBounds);
        }
        let removed = self.items.remove(index);
        logi(format!("Removed {}", removed.name()));
        if self.items.is_empty() {
            Outcome::Emptied
        } else {
            Outcome::Applied
        }
    }

    pub fn view(&self) -> SequenceView<'_> {
        let entries = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| EntryView {
                index,
                rank: index + 1,
                item,
                controls: Controls::for_mode(self.mode, index + 1),
            })
            .collect();
        SequenceView {
            mode: self.mode,
            sort_key: self.sort_key,
            entries,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::admission::RejectReason;

    pub(crate) fn png(name: &str) -> Candidate {
        Candidate::from_bytes(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    pub(crate) fn store_with(names: &[&str]) -> SequenceStore {
        let mut store = SequenceStore::new(&SessionConfig::default());
        store.mode = Mode::Manual;
        store.admit(names.iter().map(|n| png(n)).collect()).unwrap();
        store
    }

    #[test]
    fn admit_caps_at_twenty_in_submission_order() {
        let mut store = SequenceStore::new(&SessionConfig::default());
        store.mode = Mode::Manual;
        let names: Vec<String> = (1..=25).map(|i| format!("f{i:02}.png")).collect();
        let report = store
            .admit(names.iter().map(|n| png(n)).collect())
            .unwrap();

        assert_eq!(store.len(), 20);
        assert_eq!(report.admitted, 20);
        assert_eq!(report.truncated, names[20..].to_vec());
        let kept: Vec<String> = store.names().into_iter().map(String::from).collect();
        assert_eq!(kept, names[..20].to_vec());
    }

    #[test]
    fn oversized_configured_cap_still_holds_twenty() {
        let cfg = SessionConfig {
            max_items: 50,
            ..SessionConfig::default()
        };
        let mut store = SequenceStore::new(&cfg);
        let report = store
            .admit((1..=30).map(|i| png(&format!("f{i}.png"))).collect())
            .unwrap();
        assert_eq!(store.len(), 20);
        assert_eq!(report.truncated.len(), 10);
    }

    #[test]
    fn admit_counts_existing_items_against_the_cap() {
        let mut store = store_with(&["a.png"; 18]);
        let report = store.admit(vec![png("x.png"), png("y.png"), png("z.png")]).unwrap();
        assert_eq!(store.len(), 20);
        assert_eq!(report.truncated, vec!["z.png".to_string()]);

        let report = store.admit(vec![png("w.png")]).unwrap();
        assert_eq!(report.admitted, 0);
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn admit_fails_without_mutation_when_nothing_is_admissible() {
        let mut store = store_with(&["a.png"]);
        let err = store
            .admit(vec![Candidate::from_bytes("clip.mp4", "video/mp4", vec![1])])
            .unwrap_err();
        let AdmitError::NothingAdmissible { rejected } = err;
        assert_eq!(rejected[0].reason, RejectReason::UnsupportedType("video/mp4".into()));
        assert_eq!(store.names(), vec!["a.png"]);

        assert!(store.admit(Vec::new()).is_err());
    }

    #[test]
    fn admit_filters_non_images_and_keeps_the_rest() {
        let mut store = SequenceStore::new(&SessionConfig::default());
        let report = store
            .admit(vec![
                png("b.png"),
                Candidate::from_bytes("readme.txt", "text/plain", vec![1]),
                png("a.png"),
            ])
            .unwrap();
        assert_eq!(report.admitted, 2);
        assert_eq!(report.rejected.len(), 1);
        // Default mode is descending, so the append is re-sorted.
        assert_eq!(store.names(), vec!["b.png", "a.png"]);
    }

    #[test]
    fn reset_clears_and_releases_previews() {
        let mut store = store_with(&["a.png", "b.png", "c.png"]);
        assert_eq!(store.previews().live(), 3);

        store.sort_key = SortKey::Size;
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.mode(), Mode::Descending);
        assert_eq!(store.sort_key(), SortKey::Name);
        assert_eq!(store.previews().live(), 0);

        store.admit(vec![png("d.png")]).unwrap();
        assert_eq!(store.names(), vec!["d.png"]);
    }

    #[test]
    fn remove_shifts_later_items_and_releases_preview() {
        let mut store = store_with(&["a.png", "b.png", "c.png"]);
        assert_eq!(store.remove_at(1), Outcome::Applied);
        assert_eq!(store.names(), vec!["a.png", "c.png"]);
        assert_eq!(store.previews().live(), 2);

        assert_eq!(store.remove_at(2), Outcome::Ignored(Ignored::OutOfBounds));
        assert_eq!(store.remove_at(0), Outcome::Applied);
        assert_eq!(store.remove_at(0), Outcome::Emptied);
        assert_eq!(store.previews().live(), 0);
    }

    #[test]
    fn items_beyond_the_preview_limit_are_admitted_without_one() {
        let cfg = SessionConfig {
            preview_limit: 2,
            ..SessionConfig::default()
        };
        let mut store = SequenceStore::new(&cfg);
        store.admit(vec![png("a.png"), png("b.png"), png("c.png")]).unwrap();
        let with_preview = store.items().iter().filter(|i| i.preview().is_some()).count();
        assert_eq!(store.len(), 3);
        assert_eq!(with_preview, 2);
    }

    #[test]
    fn view_ranks_are_index_plus_one() {
        let store = store_with(&["x.png", "y.png"]);
        let view = store.view();
        let ranks: Vec<usize> = view.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
        assert!(view.entries.iter().all(|e| e.controls == Controls::Draggable));
    }

    #[test]
    fn item_ids_follow_admission_order() {
        let store = store_with(&["b.png", "a.png"]);
        let ids: Vec<u64> = store.items().iter().map(|i| i.id().0).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
