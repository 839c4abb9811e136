use crate::preview::PreviewHandle;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Admission order; increases monotonically for the lifetime of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Content {
    Bytes(Arc<[u8]>),
    File(PathBuf),
}

/// A file offered for admission, before policy checks.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub content: Content,
}

impl Candidate {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            content: Content::Bytes(bytes.into()),
        }
    }

    pub fn from_file(path: &Path, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            size,
            mime_type: mime_for_path(path),
            content: Content::File(path.to_path_buf()),
        }
    }
}

#[derive(Debug)]
pub struct Item {
    id: ItemId,
    name: String,
    size: u64,
    mime_type: String,
    content: Content,
    preview: Option<PreviewHandle>,
}

impl Item {
    pub(crate) fn admit(id: ItemId, candidate: Candidate, preview: Option<PreviewHandle>) -> Self {
        Self {
            id,
            name: candidate.name,
            size: candidate.size,
            mime_type: candidate.mime_type,
            content: candidate.content,
            preview,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }
}

pub fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}
