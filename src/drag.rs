use crate::session::Command;

/// In-progress drag on the tile grid, owned by whoever renders the grid.
///
/// Finishing the gesture, with or without a valid target, always clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragGesture {
    source: Option<usize>,
    over: Option<usize>,
}

impl DragGesture {
    pub fn start(&mut self, index: usize) {
        self.source = Some(index);
        self.over = None;
    }

    pub fn enter(&mut self, index: usize) {
        if self.source.is_some() {
            self.over = Some(index);
        }
    }

    pub fn leave(&mut self, index: usize) {
        if self.over == Some(index) {
            self.over = None;
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn over(&self) -> Option<usize> {
        self.over
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Ends the gesture on `target`, yielding the move to submit if a drag was active.
    pub fn drop_on(&mut self, target: usize) -> Option<Command> {
        let source = self.source.take();
        self.over = None;
        source.map(|source| Command::Move { source, target })
    }
}
