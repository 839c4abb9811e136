use crate::item::Item;
use crate::mode::{Mode, SortKey};
use crate::logw;
use std::io::{self, Write};

/// Per-item control surface, chosen by the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Sorted modes: nothing to edit, rank is derived from the sort.
    Fixed,
    /// Manual mode: the tile accepts drag start, enter, leave and drop.
    Draggable,
    /// Numeric mode: an editable rank field showing `value`.
    RankField { value: usize },
}

impl Controls {
    pub fn for_mode(mode: Mode, rank: usize) -> Self {
        match mode {
            Mode::Descending | Mode::Ascending => Controls::Fixed,
            Mode::Manual => Controls::Draggable,
            Mode::Numeric => Controls::RankField { value: rank },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    pub index: usize,
    /// 1-based display position, always `index + 1`.
    pub rank: usize,
    pub item: &'a Item,
    pub controls: Controls,
}

#[derive(Debug, Clone)]
pub struct SequenceView<'a> {
    pub mode: Mode,
    pub sort_key: SortKey,
    pub entries: Vec<EntryView<'a>>,
}

impl SequenceView<'_> {
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.item.name()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Validation failure; nothing was changed.
    Blocking(String),
    Warning(String),
}

/// Receives the sequence after every successful mutation.
pub trait Renderer {
    fn render(&mut self, view: &SequenceView<'_>);

    fn notify(&mut self, _notice: &Notice) {}
}

/// Line-oriented renderer used by the terminal driver.
///
/// Output errors do not interrupt the session; the first one is logged.
pub struct TextRenderer<W: Write> {
    out: W,
    write_failed: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            write_failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn write_view(&mut self, view: &SequenceView<'_>) -> io::Result<()> {
        writeln!(self.out, "mode: {} ({} files)", view.mode, view.entries.len())?;
        for entry in &view.entries {
            let control = match entry.controls {
                Controls::Fixed => String::new(),
                Controls::Draggable => " [drag]".to_string(),
                Controls::RankField { value } => format!(" [#{value}]"),
            };
            writeln!(
                self.out,
                "{:>3}. {} ({} bytes){}",
                entry.rank,
                entry.item.name(),
                entry.item.size(),
                control
            )?;
        }
        self.out.flush()
    }

    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            if !self.write_failed {
                self.write_failed = true;
                logw(format!("Renderer output failed: {err}"));
            }
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &SequenceView<'_>) {
        let result = self.write_view(view);
        self.check(result);
    }

    fn notify(&mut self, notice: &Notice) {
        let result = match notice {
            Notice::Blocking(msg) => writeln!(self.out, "error: {msg}"),
            Notice::Warning(msg) => writeln!(self.out, "warning: {msg}"),
        };
        self.check(result);
    }
}
