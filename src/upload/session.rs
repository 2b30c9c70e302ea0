use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::UploadError;

use super::files::PickedFile;

/// Session-local storage for uploaded files.
///
/// Copies live in a temporary directory that is removed when the store is
/// dropped, so uploads never outlive the session.
pub struct SessionStore {
    dir: TempDir,
    next: u64,
}

impl SessionStore {
    pub fn new() -> Result<Self, UploadError> {
        let dir = tempfile::Builder::new().prefix("djuzzwave-").tempdir()?;
        log::debug!("session store at {}", dir.path().display());
        Ok(Self { dir, next: 0 })
    }

    /// Copy `file` into the store and return the temporary path.
    pub fn store(&mut self, file: &PickedFile) -> Result<PathBuf, UploadError> {
        let dest = self.dir.path().join(format!("{}-{}", self.next, file.name));
        self.next += 1;
        std::fs::copy(&file.path, &dest)?;
        Ok(dest)
    }
}
