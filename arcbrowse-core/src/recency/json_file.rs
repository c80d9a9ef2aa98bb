use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::domain::{RecentFileRecord, UserId};
use crate::error::StoreError;
use crate::policy::RetentionPolicy;
use crate::recency::{RecencyStore, sort_newest_first, upsert_shared};

/// History kept in one JSON document holding every user's records.
pub struct JsonFileStore {
    path: PathBuf,
    policy: RetentionPolicy,
    // serializes read-modify-write cycles from this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub const DEFAULT_FILE_NAME: &'static str = "recent_files.json";

    pub fn new(path: impl Into<PathBuf>, policy: RetentionPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl RecencyStore for JsonFileStore {
    #[instrument(skip(self, user), fields(user = %user, store = %self.path.display()))]
    async fn add_recent_file(&self, user: &UserId, path: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let file = self.path.clone();
        let policy = self.policy;
        let user = user.clone();
        let archive = path.to_string();
        run_blocking(move || {
            let mut all = read_records(&file)?;
            upsert_shared(&mut all, &user, &archive, OffsetDateTime::now_utc(), &policy);
            write_records(&file, &all)?;
            debug!(records = all.len(), "recent files saved");
            Ok(())
        })
        .await
    }

    async fn get_recent_files(&self, user: &UserId) -> Result<Vec<RecentFileRecord>, StoreError> {
        let file = self.path.clone();
        let user = user.clone();
        run_blocking(move || {
            let mut mine: Vec<_> = read_records(&file)?
                .into_iter()
                .filter(|r| r.user_id == user)
                .collect();
            sort_newest_first(&mut mine);
            Ok(mine)
        })
        .await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
}

/// A missing file is an empty history.
fn read_records(path: &Path) -> Result<Vec<RecentFileRecord>, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_records(path: &Path, records: &[RecentFileRecord]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut w, records)?;
        w.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
