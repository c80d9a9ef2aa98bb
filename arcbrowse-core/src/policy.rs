use crate::domain::RecentFileRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Most recent records kept per user; `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::keep_last(Self::DEFAULT_MAX_RECENT)
    }
}

impl RetentionPolicy {
    pub const DEFAULT_MAX_RECENT: usize = 5;

    pub fn keep_last(n: usize) -> Self {
        Self {
            max_entries: Some(n),
        }
    }

    pub fn unlimited() -> Self {
        Self { max_entries: None }
    }

    /// Trim a user's records, which must already be newest first.
    pub fn apply(&self, records: &mut Vec<RecentFileRecord>) {
        if let Some(max) = self.max_entries {
            records.truncate(max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use time::OffsetDateTime;

    fn rec(path: &str) -> RecentFileRecord {
        RecentFileRecord {
            path: path.into(),
            user_id: UserId::fallback(),
            timestamp: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn keep_last_truncates_tail() {
        let mut v = vec![rec("c"), rec("b"), rec("a")];
        RetentionPolicy::keep_last(2).apply(&mut v);
        let paths: Vec<_> = v.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["c", "b"]);
    }

    #[test]
    fn default_keeps_five() {
        let mut v: Vec<_> = (0..8).map(|i| rec(&i.to_string())).collect();
        RetentionPolicy::default().apply(&mut v);
        assert_eq!(v.len(), RetentionPolicy::DEFAULT_MAX_RECENT);
        assert_eq!(v[0].path, "0");
    }

    #[test]
    fn unlimited_keeps_all() {
        let mut v = vec![rec("c"), rec("b"), rec("a")];
        RetentionPolicy::unlimited().apply(&mut v);
        assert_eq!(v.len(), 3);
    }
}
