//! Atomic file commits for the CLI host
//!
//! The new content is written to a uniquely named temp file next to the
//! target and renamed over it, so a failed write never leaves a half-written
//! component behind.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub struct FileTransaction {
    file_path: PathBuf,
    original_content: String,
    temp_file_path: Option<PathBuf>,
}

impl FileTransaction {
    /// Begin a transaction for an existing file
    pub fn begin(file_path: &Path) -> Result<Self> {
        let original_content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;

        debug!("Started transaction for: {}", file_path.display());
        Ok(Self {
            file_path: file_path.to_path_buf(),
            original_content,
            temp_file_path: None,
        })
    }

    /// Content of the file when the transaction began
    pub fn original(&self) -> &str {
        &self.original_content
    }

    /// Commit new content to the file atomically
    pub fn commit(mut self, content: &str) -> Result<()> {
        let base_name = self
            .file_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("fastvar_edit");
        let temp_name = format!("{}.tmp.{}", base_name, Uuid::new_v4().simple());
        let temp_path = self.file_path.with_file_name(&temp_name);

        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        self.temp_file_path = Some(temp_path.clone());

        // commit point
        fs::rename(&temp_path, &self.file_path)
            .with_context(|| format!("Failed to replace {}", self.file_path.display()))?;
        self.temp_file_path = None;

        debug!("Transaction committed for: {}", self.file_path.display());
        Ok(())
    }

    /// Put the original content back
    pub fn rollback(self) -> Result<()> {
        fs::write(&self.file_path, &self.original_content)?;
        debug!("Transaction rolled back for: {}", self.file_path.display());
        Ok(())
    }
}

impl Drop for FileTransaction {
    fn drop(&mut self) {
        if let Some(temp_path) = &self.temp_file_path {
            if temp_path.exists() {
                let _ = fs::remove_file(temp_path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_replaces_content_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("App.vue");
        fs::write(&path, "<template/>").unwrap();

        let transaction = FileTransaction::begin(&path).unwrap();
        assert_eq!(transaction.original(), "<template/>");
        transaction.commit("<template><p/></template>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<template><p/></template>");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_rollback_restores_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("App.svelte");
        fs::write(&path, "<p/>").unwrap();

        let transaction = FileTransaction::begin(&path).unwrap();
        fs::write(&path, "broken").unwrap();
        transaction.rollback().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p/>");
    }

    #[test]
    fn test_begin_fails_for_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(FileTransaction::begin(&dir.path().join("missing.vue")).is_err());
    }
}
