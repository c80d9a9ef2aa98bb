#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod policy;
pub mod tree;

pub mod engine;
pub mod engine_zip;

pub mod recency;

pub mod factory;
pub mod orchestrator;
pub mod ui;

// Re-exports: stable API surface
pub use domain::{ArchiveEntry, RecentFileRecord, UserId};
pub use orchestrator::{
    AbandonReason, ArchiveListingOrchestrator, OpenOutcome, OpenState, OpenedArchive,
};
pub use recency::{RecencyClient, RecencyStore};
pub use tree::{DirectoryNode, build_tree};
