use crate::config::{DEFAULT_MAX_ITEMS, SessionConfig};
use crate::item::Candidate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("file name is empty")]
    EmptyName,
    #[error("unsupported file type {0}")]
    UnsupportedType(String),
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Raised before any mutation; the sequence is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmitError {
    #[error("no admissible images in batch ({} rejected)", .rejected.len())]
    NothingAdmissible { rejected: Vec<Rejection> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmitReport {
    pub admitted: usize,
    pub rejected: Vec<Rejection>,
    /// Names dropped because the sequence reached its cap, in submission order.
    pub truncated: Vec<String>,
}

impl AdmitReport {
    pub fn warnings(&self, max_items: usize) -> Vec<String> {
        let mut out: Vec<String> = self.rejected.iter().map(|r| r.to_string()).collect();
        if !self.truncated.is_empty() {
            out.push(format!(
                "only {} files can be added; dropped {}",
                max_items,
                self.truncated.join(", ")
            ));
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    pub max_items: usize,
    pub max_item_bytes: u64,
    pub accepted_mime_types: Vec<String>,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl AdmissionPolicy {
    /// The item cap never exceeds [`DEFAULT_MAX_ITEMS`], whatever the config says.
    pub fn from_config(cfg: &SessionConfig) -> Self {
        Self {
            max_items: cfg.max_items.min(DEFAULT_MAX_ITEMS),
            max_item_bytes: cfg.max_item_bytes,
            accepted_mime_types: cfg.accepted_mime_types.clone(),
        }
    }

    pub fn check(&self, candidate: &Candidate) -> Result<(), RejectReason> {
        if candidate.name.trim().is_empty() {
            return Err(RejectReason::EmptyName);
        }
        let accepted = self
            .accepted_mime_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(candidate.mime_type.trim()));
        if !accepted {
            return Err(RejectReason::UnsupportedType(candidate.mime_type.clone()));
        }
        if candidate.size > self.max_item_bytes {
            return Err(RejectReason::TooLarge {
                size: candidate.size,
                limit: self.max_item_bytes,
            });
        }
        Ok(())
    }

    /// Splits a batch into admissible candidates (submission order kept) and rejections.
    pub fn screen(&self, candidates: Vec<Candidate>) -> (Vec<Candidate>, Vec<Rejection>) {
        let mut accepted = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();
        for candidate in candidates {
            match self.check(&candidate) {
                Ok(()) => accepted.push(candidate),
                Err(reason) => rejected.push(Rejection {
                    name: candidate.name,
                    reason,
                }),
            }
        }
        (accepted, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, size: usize) -> Candidate {
        Candidate::from_bytes(name, "image/png", vec![0; size])
    }

    #[test]
    fn screen_keeps_submission_order() {
        let policy = AdmissionPolicy::default();
        let batch = vec![
            png("b.png", 1),
            Candidate::from_bytes("notes.txt", "text/plain", vec![1]),
            png("a.png", 1),
        ];
        let (ok, rejected) = policy.screen(batch);
        let names: Vec<&str> = ok.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b.png", "a.png"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(
            rejected[0].reason,
            RejectReason::UnsupportedType("text/plain".to_string())
        );
    }

    #[test]
    fn mime_match_is_case_insensitive() {
        let policy = AdmissionPolicy::default();
        let c = Candidate::from_bytes("x.jpg", "IMAGE/JPEG", vec![1]);
        assert!(policy.check(&c).is_ok());
    }

    #[test]
    fn oversized_and_unnamed_files_are_rejected() {
        let policy = AdmissionPolicy {
            max_item_bytes: 4,
            ..AdmissionPolicy::default()
        };
        assert_eq!(
            policy.check(&png("big.png", 5)),
            Err(RejectReason::TooLarge { size: 5, limit: 4 })
        );
        assert!(policy.check(&png("edge.png", 4)).is_ok());
        assert_eq!(policy.check(&png("  ", 1)), Err(RejectReason::EmptyName));
    }

    #[test]
    fn configured_cap_is_clamped() {
        let cfg = SessionConfig {
            max_items: 50,
            ..SessionConfig::default()
        };
        assert_eq!(AdmissionPolicy::from_config(&cfg).max_items, DEFAULT_MAX_ITEMS);

        let cfg = SessionConfig {
            max_items: 3,
            ..SessionConfig::default()
        };
        assert_eq!(AdmissionPolicy::from_config(&cfg).max_items, 3);
    }

    #[test]
    fn truncation_warning_names_dropped_files() {
        let report = AdmitReport {
            admitted: 2,
            rejected: vec![],
            truncated: vec!["x.png".into(), "y.png".into()],
        };
        let warnings = report.warnings(20);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("x.png, y.png"));
    }
}
