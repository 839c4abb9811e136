// Every user action on the sequence is expressed as a Command.
// Event handlers (and the renderer, while it draws) queue them; Session::pump
// applies them one at a time and renders after each mutation.

use crate::config::SessionConfig;
use crate::item::Candidate;
use crate::logw;
use crate::mode::{Mode, SortKey};
use crate::render::{Notice, Renderer};
use crate::snapshot::OrderSnapshot;
use crate::store::{Outcome, SequenceStore};
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

pub const MAX_COMMANDS_PER_PUMP: usize = 64;

#[derive(Debug, Clone)]
pub enum Command {
    // ── Admission ────────────────────────────────────────────────────────────
    Admit(Vec<Candidate>),
    Remove(usize),
    Reset,

    // ── Ordering ─────────────────────────────────────────────────────────────
    SetMode(Mode),
    SetSortKey(SortKey),
    /// Drop of a dragged tile. Both indices travel with the command.
    Move { source: usize, target: usize },
    /// Raw text from a rank field; parsed when applied.
    SetPosition { index: usize, requested: String },
    RestoreSubmissionOrder,
    Restore(OrderSnapshot),
}

/// Where the editing flow is: waiting for files, or arranging them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Upload,
    Arrange,
}

#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    pub fn send(&self, cmd: Command) {
        if self.tx.send(cmd).is_err() {
            logw("Session closed; command dropped");
        }
    }
}

pub struct Session<R: Renderer> {
    store: SequenceStore,
    renderer: R,
    stage: Stage,
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl<R: Renderer> Session<R> {
    pub fn new(cfg: &SessionConfig, renderer: R) -> Self {
        Self::with_store(SequenceStore::new(cfg), renderer)
    }

    pub fn with_store(store: SequenceStore, renderer: R) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            store,
            renderer,
            stage: Stage::default(),
            tx,
            rx,
        }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    pub fn submit(&self, cmd: Command) {
        // The session holds its own receiver, so this cannot fail.
        let _ = self.tx.send(cmd);
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn render_now(&mut self) {
        self.renderer.render(&self.store.view());
    }

    /// Applies queued commands in arrival order and returns how many mutated
    /// the sequence. Commands queued by the renderer during this call are
    /// picked up after the render that produced them.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        for _ in 0..MAX_COMMANDS_PER_PUMP {
            let cmd = match self.rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            if self.apply(cmd) {
                applied += 1;
                self.renderer.render(&self.store.view());
            }
        }
        applied
    }

    pub fn dispatch(&mut self, cmd: Command) -> usize {
        self.submit(cmd);
        self.pump()
    }

    fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Admit(candidates) => self.apply_admit(candidates),
            Command::Remove(index) => match self.store.remove_at(index) {
                Outcome::Emptied => {
                    self.stage = Stage::Upload;
                    true
                }
                outcome => outcome.is_applied(),
            },
            Command::Reset => {
                self.store.reset();
                self.stage = Stage::Upload;
                true
            }
            Command::SetMode(mode) => self.store.set_mode(mode).is_applied(),
            Command::SetSortKey(key) => self.store.set_sort_key(key).is_applied(),
            Command::Move { source, target } => self.store.move_item(source, target).is_applied(),
            Command::SetPosition { index, requested } => {
                self.store.set_position_text(index, &requested).is_applied()
            }
            Command::RestoreSubmissionOrder => self.store.restore_submission_order().is_applied(),
            Command::Restore(snapshot) => self.store.restore(&snapshot).is_applied(),
        }
    }

    fn apply_admit(&mut self, candidates: Vec<Candidate>) -> bool {
        match self.store.admit(candidates) {
            Ok(report) => {
                for warning in report.warnings(self.store.policy().max_items) {
                    self.renderer.notify(&Notice::Warning(warning));
                }
                if report.admitted == 0 {
                    return false;
                }
                self.stage = Stage::Arrange;
                true
            }
            Err(err) => {
                let crate::admission::AdmitError::NothingAdmissible { rejected } = &err;
                for r in rejected {
                    self.renderer.notify(&Notice::Warning(r.to_string()));
                }
                self.renderer.notify(&Notice::Blocking(err.to_string()));
                false
            }
        }
    }
}
