use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reorder policy governing the sequence. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Descending,
    Ascending,
    Manual,
    Numeric,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Descending, Mode::Ascending, Mode::Manual, Mode::Numeric];

    /// Sorted modes own the order; entering one re-sorts the sequence.
    pub fn is_sorted(self) -> bool {
        matches!(self, Mode::Descending | Mode::Ascending)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Descending => "desc",
            Mode::Ascending => "asc",
            Mode::Manual => "manual",
            Mode::Numeric => "numeric",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => Ok(Mode::Descending),
            "asc" | "ascending" => Ok(Mode::Ascending),
            "manual" | "drag" => Ok(Mode::Manual),
            "numeric" | "number" => Ok(Mode::Numeric),
            other => anyhow::bail!("unknown mode: {other}"),
        }
    }
}

/// What the sorted modes compare. Manual and numeric modes ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Size,
    /// Admission order.
    Upload,
    /// Date and time embedded in the file name, e.g. `IMG_20240131_093015.jpg`.
    Date,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Name, SortKey::Size, SortKey::Upload, SortKey::Date];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Size => "size",
            SortKey::Upload => "upload",
            SortKey::Date => "date",
        }
    }

    /// Next key in [`SortKey::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "filename" => Ok(SortKey::Name),
            "size" => Ok(SortKey::Size),
            "upload" | "added" => Ok(SortKey::Upload),
            "date" | "time" => Ok(SortKey::Date),
            other => anyhow::bail!("unknown sort key: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_aliases() {
        for mode in Mode::ALL {
            assert_eq!(mode.label().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!("Ascending".parse::<Mode>().unwrap(), Mode::Ascending);
        assert!("shuffle".parse::<Mode>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Numeric).unwrap(), "\"numeric\"");
        assert_eq!(Mode::default(), Mode::Descending);
    }

    #[test]
    fn sort_keys_parse_and_cycle() {
        for key in SortKey::ALL {
            assert_eq!(key.label().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(SortKey::default(), SortKey::Name);
        assert_eq!(SortKey::Date.next(), SortKey::Name);
        assert!("colour".parse::<SortKey>().is_err());
    }
}
