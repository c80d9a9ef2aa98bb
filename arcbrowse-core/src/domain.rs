// arcbrowse_core/src/domain.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One item of an archive listing as reported by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub encrypted: bool,
    pub is_dir: bool,
}

impl ArchiveEntry {
    pub fn file(path: impl Into<String>, encrypted: bool) -> Self {
        Self {
            path: path.into(),
            encrypted,
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            encrypted: false,
            is_dir: true,
        }
    }
}

/// Identity that scopes every recency operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Used only when no identity source is available.
    pub const FALLBACK: &'static str = "default";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn fallback() -> Self {
        Self(Self::FALLBACK.to_string())
    }

    /// Resolve once per session: explicit value, then the OS login name, then
    /// the fallback constant. Blank values are ignored.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let from_os = std::env::var("USER")
            .ok()
            .or_else(|| std::env::var("USERNAME").ok());
        Self::resolve_from(explicit, from_os.as_deref())
    }

    fn resolve_from(explicit: Option<&str>, os_user: Option<&str>) -> Self {
        [explicit, os_user]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(Self::new)
            .unwrap_or_else(Self::fallback)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFileRecord {
    pub path: String,
    pub user_id: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_user_wins() {
        let id = UserId::resolve_from(Some("alice"), Some("bob"));
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn blank_values_fall_through() {
        assert_eq!(UserId::resolve_from(Some("  "), Some("bob")).as_str(), "bob");
        assert_eq!(UserId::resolve_from(None, Some("")), UserId::fallback());
        assert_eq!(UserId::resolve_from(None, None).as_str(), UserId::FALLBACK);
    }

    #[test]
    fn record_serializes_timestamp_as_rfc3339() {
        let rec = RecentFileRecord {
            path: "/tmp/a.zip".into(),
            user_id: UserId::new("u"),
            timestamp: time::macros::datetime!(2024-05-01 12:00:00 UTC),
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"user_id\":\"u\""));
        assert!(json.contains("2024-05-01T12:00:00Z"));
        let back: RecentFileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
