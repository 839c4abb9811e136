use crate::item::Candidate;
use crate::{logok, logw};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

async fn dir_exists(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// Candidates for every regular file directly inside `dir`, in file-name order.
///
/// Nothing is filtered here; admission decides what is acceptable.
pub async fn load_dir(dir: &Path) -> Result<Vec<Candidate>> {
    if !dir_exists(dir).await {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if entry.file_type().is_file() {
            paths.push(entry.into_path());
        }
    }

    let candidates = load_paths(&paths).await?;
    logok(format!("Found {} file(s) in {}", candidates.len(), dir.display()));
    Ok(candidates)
}

/// Candidates for explicit paths (e.g. files dropped on the window), in the
/// given order. Paths that are not regular files are skipped.
pub async fn load_paths(paths: &[PathBuf]) -> Result<Vec<Candidate>> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let meta = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if !meta.is_file() {
            logw(format!("Skipping {} (not a file)", path.display()));
            continue;
        }
        out.push(Candidate::from_file(path, meta.len()));
    }
    Ok(out)
}

pub fn display_relative(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
