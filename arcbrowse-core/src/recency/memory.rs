use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use crate::domain::{RecentFileRecord, UserId};
use crate::error::StoreError;
use crate::policy::RetentionPolicy;
use crate::recency::{RecencyStore, upsert};

/// Process-local history; gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    by_user: DashMap<UserId, Vec<RecentFileRecord>>,
    policy: RetentionPolicy,
}

impl MemoryStore {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            by_user: DashMap::new(),
            policy,
        }
    }
}

#[async_trait]
impl RecencyStore for MemoryStore {
    async fn add_recent_file(&self, user: &UserId, path: &str) -> Result<(), StoreError> {
        let mut records = self.by_user.entry(user.clone()).or_default();
        upsert(&mut records, user, path, OffsetDateTime::now_utc(), &self.policy);
        Ok(())
    }

    async fn get_recent_files(&self, user: &UserId) -> Result<Vec<RecentFileRecord>, StoreError> {
        Ok(self
            .by_user
            .get(user)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn repeated_add_keeps_one_record_with_later_timestamp() {
        let store = MemoryStore::new(RetentionPolicy::unlimited());
        let u = UserId::new("u");
        store.add_recent_file(&u, "/a.zip").await.unwrap();
        let first = store.get_recent_files(&u).await.unwrap()[0].timestamp;
        store.add_recent_file(&u, "/a.zip").await.unwrap();
        let all = store.get_recent_files(&u).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].timestamp > first);
    }

    #[tokio::test]
    async fn listing_is_strictly_descending() {
        let store = MemoryStore::new(RetentionPolicy::unlimited());
        let u = UserId::new("u");
        for p in ["/a", "/b", "/c", "/b", "/d"] {
            store.add_recent_file(&u, p).await.unwrap();
        }
        let all = store.get_recent_files(&u).await.unwrap();
        let paths: Vec<_> = all.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/d", "/b", "/c", "/a"]);
        assert!(all.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = MemoryStore::new(RetentionPolicy::unlimited());
        store.add_recent_file(&UserId::new("a"), "/x").await.unwrap();
        assert!(store.get_recent_files(&UserId::new("b")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retention_evicts_oldest() {
        let store = MemoryStore::new(RetentionPolicy::keep_last(2));
        let u = UserId::new("u");
        for p in ["/1", "/2", "/3"] {
            store.add_recent_file(&u, p).await.unwrap();
        }
        let paths: Vec<_> = store
            .get_recent_files(&u)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, ["/3", "/2"]);
    }
}
