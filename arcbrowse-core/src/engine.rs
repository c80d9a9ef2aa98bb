// arcbrowse_core/src/engine.rs
use std::path::Path;

use async_trait::async_trait;

use crate::domain::ArchiveEntry;
use crate::error::EngineError;

/// Lists archive contents, decrypting with `password` when one is given.
///
/// Without a password, implementations report each entry's encryption flag
/// so callers can decide whether to ask for one. With a password, the
/// returned entries are the authoritative decrypted listing.
#[async_trait]
pub trait ArchiveEngine: Send + Sync {
    async fn list_contents(
        &self,
        archive: &Path,
        password: Option<&str>,
    ) -> Result<Vec<ArchiveEntry>, EngineError>;
}
