use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use arcbrowse_core::error::Result;
use arcbrowse_core::factory::{EngineBackend, open_engine, open_store};
use arcbrowse_core::ui::{DisplaySink, FixedPassword, PasswordSource};
use arcbrowse_core::{ArchiveListingOrchestrator, OpenOutcome, RecencyClient};
use tracing::info;

use crate::config::Settings;
use crate::presentation::terminal::{
    StdinSelector, TerminalDisplay, TerminalPassword, canonical_or_given,
};

fn recency_from_settings(settings: &Settings) -> RecencyClient {
    RecencyClient::new(open_store(settings.store.clone(), settings.policy))
}

pub async fn handle_open(
    settings: &Settings,
    archive: Option<PathBuf>,
    password: Option<String>,
    flat: bool,
) -> Result<ExitCode> {
    let passwords: Arc<dyn PasswordSource> = match password {
        Some(p) => Arc::new(FixedPassword(Some(p))),
        None => Arc::new(TerminalPassword),
    };
    let mut orch = ArchiveListingOrchestrator::new(
        open_engine(EngineBackend::Zip),
        recency_from_settings(settings),
        passwords,
        Arc::new(TerminalDisplay::new(flat)),
        settings.user.clone(),
    );

    let outcome = match archive {
        Some(p) => orch.open(Some(canonical_or_given(p))).await,
        None => orch.open_selected(&StdinSelector).await,
    };

    match outcome {
        OpenOutcome::Opened(opened) => {
            for err in &opened.rejected {
                eprintln!("skipped: {err}");
            }
            Ok(ExitCode::SUCCESS)
        }
        OpenOutcome::Abandoned(reason) => {
            info!(?reason, "open abandoned");
            Ok(ExitCode::SUCCESS)
        }
        // already shown by the display sink
        OpenOutcome::Failed(_) => Ok(ExitCode::FAILURE),
    }
}

pub async fn handle_recent(settings: &Settings) -> Result<ExitCode> {
    let recent = recency_from_settings(settings)
        .get_recent_files(&settings.user)
        .await;
    TerminalDisplay::new(false).show_recent(&recent);
    Ok(ExitCode::SUCCESS)
}

pub async fn handle_record(settings: &Settings, archive: PathBuf) -> Result<ExitCode> {
    let archive = canonical_or_given(archive);
    recency_from_settings(settings)
        .add_recent_path(&settings.user, &archive)
        .await?;
    eprintln!("record: {} (user={})", archive.display(), settings.user);
    Ok(ExitCode::SUCCESS)
}
