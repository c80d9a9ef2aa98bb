//! Per-user history of recently opened archives.
//!
//! A [`RecencyStore`] persists one record per `(user, path)`; the
//! [`RecencyClient`] in front of it keeps store failures from ever reaching
//! the archive-open flow.

pub mod json_file;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tracing::{instrument, warn};

use crate::domain::{RecentFileRecord, UserId};
use crate::error::StoreError;
use crate::policy::RetentionPolicy;

#[async_trait]
pub trait RecencyStore: Send + Sync {
    /// Upsert the `(user, path)` record with the current time.
    async fn add_recent_file(&self, user: &UserId, path: &str) -> Result<(), StoreError>;

    /// Records for `user`, most recent first.
    async fn get_recent_files(&self, user: &UserId) -> Result<Vec<RecentFileRecord>, StoreError>;
}

#[derive(Clone)]
pub struct RecencyClient {
    store: Arc<dyn RecencyStore>,
}

impl RecencyClient {
    pub fn new(store: Arc<dyn RecencyStore>) -> Self {
        Self { store }
    }

    /// Failures are returned so the caller can report them; they are never
    /// fatal to an open.
    #[instrument(skip(self, user), fields(user = %user))]
    pub async fn add_recent_file(&self, user: &UserId, path: &str) -> Result<(), StoreError> {
        self.store.add_recent_file(user, path).await
    }

    /// Record a filesystem path. Paths that are not valid UTF-8 are refused
    /// rather than stored in a form that could not be reopened.
    pub async fn add_recent_path(&self, user: &UserId, path: &Path) -> Result<(), StoreError> {
        let Some(text) = path.to_str() else {
            warn!(path = %path.display(), "not recording non-UTF-8 path");
            return Err(StoreError::NonUtf8Path(path.to_path_buf()));
        };
        self.add_recent_file(user, text).await
    }

    /// Never fails: an unavailable store reads as an empty history.
    #[instrument(skip(self, user), fields(user = %user))]
    pub async fn get_recent_files(&self, user: &UserId) -> Vec<RecentFileRecord> {
        match self.store.get_recent_files(user).await {
            Ok(records) => normalize(user, records),
            Err(e) => {
                warn!(error = %e, "recent files unavailable; showing none");
                Vec::new()
            }
        }
    }
}

/// Scope to `user`, order newest first and keep one record per path.
fn normalize(user: &UserId, mut records: Vec<RecentFileRecord>) -> Vec<RecentFileRecord> {
    records.retain(|r| &r.user_id == user);
    sort_newest_first(&mut records);
    let mut seen = std::collections::HashSet::new();
    records.retain(|r| seen.insert(r.path.clone()));
    records
}

pub(crate) fn sort_newest_first(records: &mut [RecentFileRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Upsert into one user's records (newest first). Timestamps stay strictly
/// increasing even when the clock has not moved since the last write.
pub(crate) fn upsert(
    records: &mut Vec<RecentFileRecord>,
    user: &UserId,
    path: &str,
    now: OffsetDateTime,
    policy: &RetentionPolicy,
) {
    let timestamp = match records.first() {
        Some(newest) if newest.timestamp >= now => newest.timestamp + Duration::nanoseconds(1),
        _ => now,
    };
    records.retain(|r| r.path != path);
    records.insert(
        0,
        RecentFileRecord {
            path: path.to_string(),
            user_id: user.clone(),
            timestamp,
        },
    );
    policy.apply(records);
}

/// Same as [`upsert`] over a flat list holding every user's records.
pub(crate) fn upsert_shared(
    all: &mut Vec<RecentFileRecord>,
    user: &UserId,
    path: &str,
    now: OffsetDateTime,
    policy: &RetentionPolicy,
) {
    let (mut mine, others): (Vec<_>, Vec<_>) = all.drain(..).partition(|r| &r.user_id == user);
    sort_newest_first(&mut mine);
    upsert(&mut mine, user, path, now, policy);
    *all = others;
    all.extend(mine);
}
