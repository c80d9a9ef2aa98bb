//! The "open archive" action as an explicit state machine.
//!
//! ```text
//! Idle -> Requesting(no password) -> Success
//!                                 -> Failure
//!                                 -> NeedsPassword -> AwaitingPassword
//!                                        -> Requesting(password) -> Success | Failure
//! ```
//!
//! Every action ends back in `Idle`. The engine decides encryption per entry
//! only while listing, so the first request is always unauthenticated; if any
//! entry comes back encrypted the whole listing is discarded and re-requested
//! with a password.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::{ArchiveEntry, RecentFileRecord, UserId};
use crate::engine::ArchiveEngine;
use crate::error::{EngineError, TreeError};
use crate::recency::RecencyClient;
use crate::tree::{DirectoryNode, build_entry_tree};
use crate::ui::{DisplaySink, FileSelector, PasswordSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenState {
    Idle,
    Requesting { with_password: bool },
    NeedsPassword,
    AwaitingPassword,
    Success,
    Failure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbandonReason {
    NoSelection,
    PasswordDeclined,
}

#[derive(Debug)]
pub struct OpenedArchive {
    pub archive: PathBuf,
    pub tree: DirectoryNode,
    /// The authoritative listing the tree was built from.
    pub entries: Vec<ArchiveEntry>,
    pub used_password: bool,
    /// Entries left out of the tree because their path was malformed.
    pub rejected: Vec<TreeError>,
}

#[derive(Debug)]
pub enum OpenOutcome {
    Opened(OpenedArchive),
    /// User cancelled; nothing was displayed or recorded.
    Abandoned(AbandonReason),
    /// Engine error, already handed to the display sink.
    Failed(EngineError),
}

pub struct ArchiveListingOrchestrator {
    engine: Arc<dyn ArchiveEngine>,
    recency: RecencyClient,
    passwords: Arc<dyn PasswordSource>,
    display: Arc<dyn DisplaySink>,
    user: UserId,
    state: OpenState,
    trail: Vec<OpenState>,
}

impl ArchiveListingOrchestrator {
    pub fn new(
        engine: Arc<dyn ArchiveEngine>,
        recency: RecencyClient,
        passwords: Arc<dyn PasswordSource>,
        display: Arc<dyn DisplaySink>,
        user: UserId,
    ) -> Self {
        Self {
            engine,
            recency,
            passwords,
            display,
            user,
            state: OpenState::Idle,
            trail: Vec::new(),
        }
    }

    pub fn state(&self) -> OpenState {
        self.state
    }

    /// States entered by the most recent action, in order.
    pub fn transitions(&self) -> &[OpenState] {
        &self.trail
    }

    pub async fn open_selected(&mut self, selector: &dyn FileSelector) -> OpenOutcome {
        let selection = selector.select_archive().await;
        self.open(selection).await
    }

    #[instrument(skip(self), fields(user = %self.user))]
    pub async fn open(&mut self, selection: Option<PathBuf>) -> OpenOutcome {
        self.trail.clear();
        let Some(archive) = selection else {
            debug!("no archive selected");
            return self.finish(OpenOutcome::Abandoned(AbandonReason::NoSelection));
        };

        self.enter(OpenState::Requesting {
            with_password: false,
        });
        let first = match self.engine.list_contents(&archive, None).await {
            Ok(entries) => entries,
            Err(e) => return self.fail(&archive, e),
        };

        if !first.iter().any(|e| e.encrypted) {
            return self.succeed(archive, first, false).await;
        }

        // partial listings are never shown
        drop(first);
        self.enter(OpenState::NeedsPassword);
        self.enter(OpenState::AwaitingPassword);
        let Some(password) = self.passwords.request_password(&archive).await else {
            info!(archive = %archive.display(), "password prompt declined");
            return self.finish(OpenOutcome::Abandoned(AbandonReason::PasswordDeclined));
        };

        self.enter(OpenState::Requesting {
            with_password: true,
        });
        match self.engine.list_contents(&archive, Some(&password)).await {
            Ok(entries) => self.succeed(archive, entries, true).await,
            Err(e) => self.fail(&archive, e),
        }
    }

    /// Hand the current history to the display and return it.
    pub async fn show_recent(&self) -> Vec<RecentFileRecord> {
        let recent = self.recency.get_recent_files(&self.user).await;
        self.display.show_recent(&recent);
        recent
    }

    async fn succeed(
        &mut self,
        archive: PathBuf,
        entries: Vec<ArchiveEntry>,
        used_password: bool,
    ) -> OpenOutcome {
        self.enter(OpenState::Success);

        let (tree, rejected) = build_entry_tree(&entries);
        for err in &rejected {
            warn!(error = %err, "skipping entry");
        }
        self.display.show_tree(&archive, &tree);

        if let Err(e) = self.recency.add_recent_path(&self.user, &archive).await {
            warn!(error = %e, "could not record recent file");
        }
        info!(
            archive = %archive.display(),
            entries = entries.len(),
            used_password,
            "archive opened"
        );
        self.show_recent().await;

        self.finish(OpenOutcome::Opened(OpenedArchive {
            archive,
            tree,
            entries,
            used_password,
            rejected,
        }))
    }

    fn fail(&mut self, archive: &Path, error: EngineError) -> OpenOutcome {
        self.enter(OpenState::Failure);
        warn!(error = %error, "listing failed");
        self.display.show_error(archive, &error);
        self.finish(OpenOutcome::Failed(error))
    }

    fn finish(&mut self, outcome: OpenOutcome) -> OpenOutcome {
        self.enter(OpenState::Idle);
        outcome
    }

    fn enter(&mut self, next: OpenState) {
        if self.state == next {
            return;
        }
        debug!(from = ?self.state, to = ?next, "transition");
        self.state = next;
        self.trail.push(next);
    }
}
