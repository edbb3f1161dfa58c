//! Fixtures shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};

/// Uniquely named directory under the system temp dir, removed on drop.
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("relief_{label}_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).expect("failed to create scratch dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        let dir = self.path.join(name);
        fs::create_dir_all(&dir).expect("failed to create scratch subdir");
        dir
    }

    /// Create an empty file (content is irrelevant for listing tests).
    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.path.join(relative);
        fs::write(&path, b"").expect("failed to create file");
        path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
