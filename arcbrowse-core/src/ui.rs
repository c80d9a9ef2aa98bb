// arcbrowse_core/src/ui.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::RecentFileRecord;
use crate::error::EngineError;
use crate::tree::DirectoryNode;

/// One-shot archive picker. `None` means the user cancelled.
#[async_trait]
pub trait FileSelector: Send + Sync {
    async fn select_archive(&self) -> Option<PathBuf>;
}

/// One-shot password prompt. `None` means the user declined.
#[async_trait]
pub trait PasswordSource: Send + Sync {
    async fn request_password(&self, archive: &Path) -> Option<String>;
}

/// Receives computed values; owns all rendering.
pub trait DisplaySink: Send + Sync {
    fn show_tree(&self, archive: &Path, tree: &DirectoryNode);

    fn show_recent(&self, records: &[RecentFileRecord]);

    fn show_error(&self, archive: &Path, error: &EngineError);
}

/// Selector with a fixed answer, for paths given up front.
#[derive(Clone, Debug)]
pub struct FixedSelection(pub Option<PathBuf>);

#[async_trait]
impl FileSelector for FixedSelection {
    async fn select_archive(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Password source with a fixed answer, for non-interactive use.
#[derive(Clone, Debug)]
pub struct FixedPassword(pub Option<String>);

#[async_trait]
impl PasswordSource for FixedPassword {
    async fn request_password(&self, _archive: &Path) -> Option<String> {
        self.0.clone()
    }
}
