use crate::error::{Result, ThumbnailError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const IMAGE_EXTENSION: &str = "png";
pub const MAX_STEM_LEN: usize = 100;

/// The directory images are written into. `prepare` wipes and recreates it.
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Removes whatever sits at the path (directory or file), then creates it empty.
    ///
    /// Creates the directory even when nothing was there before.
    pub async fn prepare(&self) -> Result<()> {
        let wrap = |source: std::io::Error| ThumbnailError::OutputDirectory {
            path: self.path.clone(),
            source,
        };

        match fs::symlink_metadata(&self.path).await {
            Ok(meta) if meta.is_dir() => {
                log::warn!("🗑️  Removing existing output directory {}", self.path.display());
                fs::remove_dir_all(&self.path).await.map_err(wrap)?;
            }
            Ok(_) => {
                log::warn!("🗑️  Replacing file at {} with a directory", self.path.display());
                fs::remove_file(&self.path).await.map_err(wrap)?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(wrap(e)),
        }

        fs::create_dir_all(&self.path).await.map_err(wrap)?;
        log::info!("📁 Output directory ready: {}", self.path.display());
        Ok(())
    }
}

/// Turns free-form concept text into a safe file stem.
///
/// Keeps ASCII alphanumerics, space, `-`, `_` and `.`; everything else becomes `_`.
/// Leading/trailing whitespace, dots and underscores are trimmed and the result is
/// capped at [`MAX_STEM_LEN`] characters. Returns `None` when nothing usable is left.
pub fn sanitize_file_stem(name: &str) -> Option<String> {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | ' ' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '_');
    let capped: String = trimmed.chars().take(MAX_STEM_LEN).collect();
    let capped = capped.trim_end_matches(|c: char| c.is_whitespace() || c == '.' || c == '_');

    if capped.chars().any(|c| c.is_ascii_alphanumeric()) {
        Some(capped.to_string())
    } else {
        None
    }
}

/// Hands out unique file paths inside one output directory for a single run.
#[derive(Debug)]
pub struct FileNamer {
    dir: PathBuf,
    used: HashSet<String>,
}

impl FileNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            used: HashSet::new(),
        }
    }

    /// `index` is 0-based and only used for the fallback name.
    pub fn path_for(&mut self, concept: &str, index: usize) -> PathBuf {
        let stem = sanitize_file_stem(concept).unwrap_or_else(|| format!("concept-{}", index + 1));

        let mut candidate = stem.clone();
        let mut n = 2;
        while !self.used.insert(candidate.to_ascii_lowercase()) {
            candidate = format!("{} ({})", stem, n);
            n += 1;
        }

        if candidate != concept {
            log::debug!("Concept '{}' saved as '{}'", concept, candidate);
        }
        self.dir.join(format!("{}.{}", candidate, IMAGE_EXTENSION))
    }
}
