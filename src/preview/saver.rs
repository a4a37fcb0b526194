//! File save collaborator

use crate::error::Result;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Receives finished output for the user to keep.
///
/// Fire-and-forget: the caller never observes whether the save succeeded.
pub trait FileSaver: Send + Sync {
    fn save(&self, bytes: &[u8], suggested_name: &str, mime_type: &str);
}

impl<T: FileSaver + ?Sized> FileSaver for std::sync::Arc<T> {
    fn save(&self, bytes: &[u8], suggested_name: &str, mime_type: &str) {
        (**self).save(bytes, suggested_name, mime_type)
    }
}

/// Saves files into a directory, creating it on first use
pub struct DirectorySaver {
    dir: PathBuf,
    saved: Mutex<Vec<PathBuf>>,
}

impl DirectorySaver {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in save order
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved.lock().clone()
    }

    /// Resolve a suggested name inside the target directory.
    /// Only the final path component is kept so names cannot escape the directory.
    fn target_path(&self, suggested_name: &str) -> PathBuf {
        let file_name = Path::new(suggested_name)
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "download".into());
        self.dir.join(file_name)
    }

    fn write(&self, bytes: &[u8], suggested_name: &str) -> Result<PathBuf> {
        if !self.dir.as_os_str().is_empty() && !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }

        let path = self.target_path(suggested_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, bytes: &[u8], suggested_name: &str, mime_type: &str) {
        match self.write(bytes, suggested_name) {
            Ok(path) => {
                tracing::info!(path = %path.display(), mime_type, size = bytes.len(), "saved file");
                self.saved.lock().push(path);
            }
            Err(e) => {
                tracing::warn!(error = %e, name = suggested_name, "failed to save file");
            }
        }
    }
}
