pub mod handlers;

use std::process::ExitCode;

use crate::config::Settings;
use crate::presentation::cli::{Cli, Commands};
use arcbrowse_core::error::Result;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::from_cli(&cli)?;
    tracing::debug!(user = %settings.user, store = ?settings.store, "settings resolved");

    match cli.command {
        Commands::Open {
            archive,
            password,
            flat,
        } => handlers::handle_open(&settings, archive, password, flat).await,
        Commands::Recent => handlers::handle_recent(&settings).await,
        Commands::Record { archive } => handlers::handle_record(&settings, archive).await,
    }
}
