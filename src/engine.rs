//! Reorder operations on [`SequenceStore`].
//!
//! Every operation either produces a full permutation of the current items or
//! leaves the sequence exactly as it was.

use crate::collate::compare_by;
use crate::logi;
use crate::mode::{Mode, SortKey};
use crate::store::{Ignored, Outcome, SequenceStore};

/// Removes the element at `from` and reinserts it at `to`, shifting the
/// elements in between by one slot. Out-of-range indices leave `items` as is.
pub fn relocate<T>(items: &mut Vec<T>, from: usize, to: usize) -> Outcome {
    let len = items.len();
    if from >= len || to >= len {
        return Outcome::Ignored(Ignored::OutOfBounds);
    }
    if from == to {
        return Outcome::Ignored(Ignored::Unchanged);
    }
    let moved = items.remove(from);
    items.insert(to, moved);
    Outcome::Applied
}

/// Parses a typed rank. Integral decimals such as `3.0` count as integers.
pub fn parse_rank(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

impl SequenceStore {
    pub(crate) fn sort_by_mode(&mut self) {
        let key = self.sort_key;
        match self.mode {
            Mode::Descending => self.items.sort_by(|a, b| compare_by(key, b, a)),
            Mode::Ascending => self.items.sort_by(|a, b| compare_by(key, a, b)),
            Mode::Manual | Mode::Numeric => {}
        }
    }

    /// Chooses what the sorted modes compare. The sequence is re-sorted at
    /// once if a sorted mode is active.
    pub fn set_sort_key(&mut self, key: SortKey) -> Outcome {
        if self.sort_key == key {
            return Outcome::Ignored(Ignored::Unchanged);
        }
        let previous = self.sort_key;
        self.sort_key = key;
        self.sort_by_mode();
        logi(format!("Sort by {previous} -> {key}"));
        Outcome::Applied
    }

    /// Switches the active mode. Entering a sorted mode re-sorts the whole
    /// sequence; entering manual or numeric freezes the current order.
    pub fn set_mode(&mut self, mode: Mode) -> Outcome {
        let previous = self.mode;
        self.mode = mode;
        self.sort_by_mode();
        if previous != mode {
            logi(format!("Mode {previous} -> {mode}"));
        }
        Outcome::Applied
    }

    /// Drag-and-drop relocation. A drop while a sorted mode is active hands
    /// the order over to manual mode.
    pub fn move_item(&mut self, source: usize, target: usize) -> Outcome {
        let outcome = relocate(&mut self.items, source, target);
        if outcome.is_applied() {
            if self.mode.is_sorted() {
                self.mode = Mode::Manual;
            }
        } else {
            tracing::debug!(source, target, ?outcome, "move ignored");
        }
        outcome
    }

    /// Puts the item at `current_index` at 1-based `requested` position.
    ///
    /// Every item between the old and new position is renumbered; nothing is
    /// swapped. A request while a sorted mode is active switches to numeric.
    pub fn set_position(&mut self, current_index: usize, requested: i64) -> Outcome {
        let len = self.items.len();
        if current_index >= len || requested < 1 || requested as u64 > len as u64 {
            tracing::debug!(current_index, requested, len, "position ignored: out of bounds");
            return Outcome::Ignored(Ignored::OutOfBounds);
        }
        let target = (requested - 1) as usize;
        let outcome = relocate(&mut self.items, current_index, target);
        if outcome.is_applied() && self.mode.is_sorted() {
            self.mode = Mode::Numeric;
        }
        outcome
    }

    pub fn set_position_text(&mut self, current_index: usize, raw: &str) -> Outcome {
        match parse_rank(raw) {
            Some(requested) => self.set_position(current_index, requested),
            None => {
                tracing::debug!(current_index, raw, "position ignored: not an integer");
                Outcome::Ignored(Ignored::NotAnInteger)
            }
        }
    }

    /// Puts the items back in the order they were admitted.
    pub fn restore_submission_order(&mut self) -> Outcome {
        self.items.sort_by_key(|item| item.id());
        self.mode = Mode::Manual;
        Outcome::Applied
    }
}
