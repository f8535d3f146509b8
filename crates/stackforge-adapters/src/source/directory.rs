//! Documents read from a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use stackforge_core::{
    application::{ApplicationError, ports::DocumentSource},
    domain::{DocumentFormat, RawDocument},
    error::{ForgeError, ForgeResult},
};

/// Production document source.
///
/// A document with id `app` is the file `app.yml`, `app.yaml`, `app.json` or
/// `app.toml` anywhere under the root, up to `max_depth` levels deep. When
/// several files match, the extension order of
/// [`DocumentFormat::EXTENSIONS`] decides, then the shallower path, then the
/// path itself.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    max_depth: usize,
}

impl DirectorySource {
    pub const DEFAULT_MAX_DEPTH: usize = 3;

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that would be read for `id`.
    pub fn locate(&self, id: &str) -> ForgeResult<Option<PathBuf>> {
        let mut best: Option<(usize, usize, PathBuf)> = None;

        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(self.max_depth) {
            let entry = entry.map_err(|e| unreadable(id, &self.root, &e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) != Some(id) {
                continue;
            }
            let Some(rank) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(|ext| {
                    DocumentFormat::EXTENSIONS
                        .iter()
                        .position(|known| known.eq_ignore_ascii_case(ext))
                })
            else {
                continue;
            };

            trace!(path = %path.display(), "Candidate document");
            let candidate = (rank, entry.depth(), path.to_path_buf());
            if best.as_ref().is_none_or(|current| candidate < *current) {
                best = Some(candidate);
            }
        }

        Ok(best.map(|(_, _, path)| path))
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, id: &str) -> ForgeResult<Option<RawDocument>> {
        let Some(path) = self.locate(id)? else {
            debug!(id, root = %self.root.display(), "Document not found");
            return Ok(None);
        };

        let format = DocumentFormat::from_path(&path).ok_or_else(|| ForgeError::Internal {
            message: format!("no format for {}", path.display()),
        })?;
        let text = fs::read_to_string(&path).map_err(|e| unreadable(id, &path, &e.to_string()))?;

        debug!(id, path = %path.display(), %format, "Document read");
        Ok(Some(RawDocument::new(id, format, text)))
    }
}

fn unreadable(id: &str, path: &Path, reason: &str) -> ForgeError {
    ApplicationError::ConfigurationNotFound {
        id: id.to_string(),
        reason: format!("failed to read {}: {reason}", path.display()),
    }
    .into()
}
