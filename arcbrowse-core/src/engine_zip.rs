use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::domain::ArchiveEntry;
use crate::engine::ArchiveEngine;
use crate::error::EngineError;

/// ZIP listing backed by the `zip` crate. Parsing and decryption stay inside
/// that crate; this adapter only maps entries and errors.
#[derive(Clone, Debug, Default)]
pub struct ZipEngine;

impl ZipEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArchiveEngine for ZipEngine {
    #[instrument(skip(self, password), fields(with_password = password.is_some()))]
    async fn list_contents(
        &self,
        archive: &Path,
        password: Option<&str>,
    ) -> Result<Vec<ArchiveEntry>, EngineError> {
        let archive = archive.to_path_buf();
        let password = password.map(str::to_owned);
        let path_for_err = archive.clone();
        tokio::task::spawn_blocking(move || list_zip(&archive, password.as_deref()))
            .await
            .map_err(|e| EngineError::Unreadable {
                archive: path_for_err,
                source: std::io::Error::other(e),
            })?
    }
}

fn list_zip(archive: &Path, password: Option<&str>) -> Result<Vec<ArchiveEntry>, EngineError> {
    let file = File::open(archive).map_err(|source| EngineError::Unreadable {
        archive: archive.to_path_buf(),
        source,
    })?;
    let mut zip =
        ZipArchive::new(BufReader::new(file)).map_err(|e| map_zip_error(archive, e, password))?;

    let mut entries = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        // Raw access reads headers only, so encrypted entries list without a key.
        let (name, is_dir, encrypted) = {
            let f = zip
                .by_index_raw(i)
                .map_err(|e| map_zip_error(archive, e, password))?;
            (f.name().to_string(), f.is_dir(), f.encrypted())
        };

        let decrypted = match (encrypted, password) {
            (true, Some(pw)) => {
                zip.by_index_decrypt(i, pw.as_bytes())
                    .map_err(|e| map_zip_error(archive, e, password))?;
                true
            }
            _ => false,
        };

        let path = name.trim_end_matches('/').to_string();
        if path.is_empty() {
            continue;
        }
        entries.push(ArchiveEntry {
            path,
            encrypted: encrypted && !decrypted,
            is_dir,
        });
    }
    debug!(count = entries.len(), archive = %archive.display(), "zip listing");
    Ok(entries)
}

fn map_zip_error(archive: &Path, error: ZipError, password: Option<&str>) -> EngineError {
    let archive: PathBuf = archive.to_path_buf();
    match error {
        ZipError::InvalidPassword => EngineError::WrongPassword { archive },
        ZipError::UnsupportedArchive(detail)
            if password.is_some() && detail.to_ascii_lowercase().contains("password") =>
        {
            EngineError::WrongPassword { archive }
        }
        ZipError::UnsupportedArchive(detail) => EngineError::Unsupported {
            archive,
            reason: detail.to_string(),
        },
        ZipError::Io(source) => EngineError::Unreadable { archive, source },
        other => EngineError::Malformed {
            archive,
            reason: other.to_string(),
        },
    }
}
