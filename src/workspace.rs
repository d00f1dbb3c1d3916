//! Per-request temporary resource set.
//!
//! Every request owns a [`Workspace`]: a fresh correlation id and the local
//! paths derived from it. The workspace is never shared between requests,
//! and dropping it deletes every path it may have produced. That drop is
//! the cleanup guarantee for all exit paths, including failures while the
//! response is still streaming.

use crate::error::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The set of local files one request may create.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    id: String,
}

impl Workspace {
    /// Allocate a workspace with a fresh correlation id under `root`.
    ///
    /// Creates `root` if it does not exist yet.
    pub fn create(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            dir: root.to_path_buf(),
            id: Uuid::new_v4().to_string(),
        })
    }

    /// The request correlation id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The directory holding this workspace's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Local path for the fetched video.
    pub fn video_path(&self) -> PathBuf {
        self.dir.join(format!("{}.mp4", self.id))
    }

    /// Local path for the subtitle file (fetched or produced).
    pub fn subtitle_path(&self) -> PathBuf {
        self.dir.join(format!("{}.srt", self.id))
    }

    /// Local path for the fetched font.
    pub fn font_path(&self) -> PathBuf {
        self.dir.join(format!("{}.ttf", self.id))
    }

    /// Local path for the rendered output video.
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(format!("{}_captioned.mp4", self.id))
    }

    /// Font family name derived from the font file's stem.
    pub fn font_name(&self) -> String {
        self.font_path()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn paths(&self) -> [PathBuf; 4] {
        [
            self.video_path(),
            self.subtitle_path(),
            self.font_path(),
            self.output_path(),
        ]
    }

    /// Delete every file this workspace may have produced.
    ///
    /// Each path is attempted independently; a failed deletion is logged
    /// and never suppresses the remaining ones. Missing files are not an
    /// error, so this is safe to call more than once.
    pub fn remove_all(&self) {
        for path in self.paths() {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(id = %self.id, path = %path.display(), "removed temporary file");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        id = %self.id,
                        path = %path.display(),
                        error = %e,
                        "failed to remove temporary file"
                    );
                }
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove_all();
    }
}
