use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arcbrowse_core::engine::ArchiveEngine;
use arcbrowse_core::engine_zip::ZipEngine;
use arcbrowse_core::error::EngineError;
use arcbrowse_core::policy::RetentionPolicy;
use arcbrowse_core::recency::memory::MemoryStore;
use arcbrowse_core::ui::{DisplaySink, FixedPassword};
use arcbrowse_core::{
    ArchiveEntry, ArchiveListingOrchestrator, DirectoryNode, OpenOutcome, OpenState,
    RecencyClient, RecencyStore, RecentFileRecord, UserId,
};
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;

const PASSWORD: &str = "correct horse";

fn write_zip(dir: &Path, name: &str, encrypt_secret: bool) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let plain = SimpleFileOptions::default();
    let locked = if encrypt_secret {
        SimpleFileOptions::default().with_deprecated_encryption(PASSWORD.as_bytes())
    } else {
        plain
    };

    zip.add_directory("docs/", plain).unwrap();
    zip.start_file("docs/readme.txt", plain).unwrap();
    zip.write_all(b"hello").unwrap();
    zip.start_file("secret/keys.txt", locked).unwrap();
    zip.write_all(b"top secret").unwrap();
    zip.add_directory("empty/", plain).unwrap();
    zip.finish().unwrap();
    path
}

#[tokio::test]
async fn lists_plain_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "plain.zip", false);

    let entries = ZipEngine::new().list_contents(&archive, None).await.unwrap();

    assert_eq!(
        entries,
        [
            ArchiveEntry::dir("docs"),
            ArchiveEntry::file("docs/readme.txt", false),
            ArchiveEntry::file("secret/keys.txt", false),
            ArchiveEntry::dir("empty"),
        ]
    );
}

#[tokio::test]
async fn flags_encrypted_entries_without_password() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "locked.zip", true);

    let entries = ZipEngine::new().list_contents(&archive, None).await.unwrap();

    let flagged: Vec<_> = entries
        .iter()
        .filter(|e| e.encrypted)
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(flagged, ["secret/keys.txt"]);
}

#[tokio::test]
async fn password_listing_reports_decrypted_entries() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "locked.zip", true);

    let entries = ZipEngine::new()
        .list_contents(&archive, Some(PASSWORD))
        .await
        .unwrap();

    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| !e.encrypted));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "locked.zip", true);

    let err = ZipEngine::new()
        .list_contents(&archive, Some("wrong"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, EngineError::WrongPassword { archive: ref a } if a == &archive),
        "unexpected {err:?}"
    );
}

#[tokio::test]
async fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = ZipEngine::new()
        .list_contents(&dir.path().join("nope.zip"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unreadable { .. }));
}

#[tokio::test]
async fn garbage_is_not_an_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.zip");
    std::fs::write(&path, b"definitely not a zip file").unwrap();

    let err = ZipEngine::new().list_contents(&path, None).await.unwrap_err();

    assert!(
        matches!(err, EngineError::Malformed { .. } | EngineError::Unsupported { .. }),
        "unexpected {err:?}"
    );
}

#[derive(Default)]
struct Captured {
    tree: Mutex<Option<DirectoryNode>>,
    recent: Mutex<Vec<RecentFileRecord>>,
    errors: Mutex<Vec<String>>,
}

impl DisplaySink for Captured {
    fn show_tree(&self, _archive: &Path, tree: &DirectoryNode) {
        *self.tree.lock().unwrap() = Some(tree.clone());
    }

    fn show_recent(&self, records: &[RecentFileRecord]) {
        *self.recent.lock().unwrap() = records.to_vec();
    }

    fn show_error(&self, _archive: &Path, error: &EngineError) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

#[tokio::test]
async fn end_to_end_open_of_protected_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "locked.zip", true);
    let display = Arc::new(Captured::default());
    let mut orch = ArchiveListingOrchestrator::new(
        Arc::new(ZipEngine::new()),
        RecencyClient::new(Arc::new(MemoryStore::new(RetentionPolicy::default()))),
        Arc::new(FixedPassword(Some(PASSWORD.to_string()))),
        display.clone(),
        UserId::new("e2e"),
    );

    let outcome = orch.open(Some(archive.clone())).await;

    assert!(matches!(outcome, OpenOutcome::Opened(ref o) if o.used_password));
    let tree = display.tree.lock().unwrap().clone().unwrap();
    assert!(tree.get("docs/readme.txt").unwrap().is_leaf());
    assert!(tree.get("secret/keys.txt").unwrap().is_leaf());
    assert!(tree.get("empty").unwrap().children().unwrap().is_empty());

    let recent = display.recent.lock().unwrap().clone();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].path, archive.to_string_lossy());
    assert_eq!(recent[0].user_id, UserId::new("e2e"));
    assert!(display.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn end_to_end_wrong_password_fails_without_recording() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_zip(dir.path(), "locked.zip", true);
    let store = Arc::new(MemoryStore::new(RetentionPolicy::default()));
    let display = Arc::new(Captured::default());
    let user = UserId::new("e2e");
    let mut orch = ArchiveListingOrchestrator::new(
        Arc::new(ZipEngine::new()),
        RecencyClient::new(store.clone()),
        Arc::new(FixedPassword(Some("wrong".to_string()))),
        display.clone(),
        user.clone(),
    );

    let outcome = orch.open(Some(archive)).await;

    assert!(
        matches!(outcome, OpenOutcome::Failed(EngineError::WrongPassword { .. })),
        "unexpected {outcome:?}"
    );
    assert!(display.tree.lock().unwrap().is_none());
    assert_eq!(display.errors.lock().unwrap().len(), 1);
    assert!(store.get_recent_files(&user).await.unwrap().is_empty());
    assert_eq!(orch.state(), OpenState::Idle);
}
