use arcbrowse_core::policy::RetentionPolicy;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "arcbrowse: browse archives, remember recent ones",
    long_about = None
)]
pub struct Cli {
    /// identity whose recent-files history is read and written
    #[arg(long, global = true, env = "ARCBROWSE_USER")]
    pub user: Option<String>,

    /// where recent files are kept
    #[arg(
        long,
        global = true,
        value_enum,
        env = "ARCBROWSE_STORE",
        default_value_t = StoreKind::Json
    )]
    pub store: StoreKind,

    /// JSON history file (defaults to the platform data directory)
    #[arg(long = "store-path", global = true, env = "ARCBROWSE_STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// recent files kept per user; 0 keeps all
    #[arg(
        long = "max-recent",
        global = true,
        env = "ARCBROWSE_MAX_RECENT",
        default_value_t = RetentionPolicy::DEFAULT_MAX_RECENT
    )]
    pub max_recent: usize,

    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Json,
    Memory,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List an archive as a directory tree and record it as recent
    Open {
        /// archive to open; read from stdin when omitted
        archive: Option<PathBuf>,

        /// password for encrypted archives; prompted for when needed and omitted
        #[arg(long, env = "ARCBROWSE_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// print one path per line instead of a tree
        #[arg(long)]
        flat: bool,
    },

    /// Show recently opened archives, newest first
    Recent,

    /// Record an archive as recently opened without listing it
    Record { archive: PathBuf },
}
