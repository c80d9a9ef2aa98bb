use std::path::PathBuf;

use arcbrowse_core::UserId;
use arcbrowse_core::error::{Error, Result};
use arcbrowse_core::factory::StoreBackend;
use arcbrowse_core::policy::RetentionPolicy;
use arcbrowse_core::recency::json_file::JsonFileStore;

use crate::presentation::cli::{Cli, StoreKind};

/// Session settings resolved once from flags and environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub user: UserId,
    pub store: StoreBackend,
    pub policy: RetentionPolicy,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let store = match cli.store {
            StoreKind::Memory => StoreBackend::Memory,
            StoreKind::Json => {
                let path = cli.store_path.clone().unwrap_or_else(default_store_path);
                if path.is_dir() {
                    return Err(Error::Config(format!(
                        "store path {} is a directory",
                        path.display()
                    )));
                }
                StoreBackend::JsonFile(path)
            }
        };
        let policy = match cli.max_recent {
            0 => RetentionPolicy::unlimited(),
            n => RetentionPolicy::keep_last(n),
        };
        Ok(Self {
            user: UserId::resolve(cli.user.as_deref()),
            store,
            policy,
        })
    }
}

fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "arcbrowse")
        .map(|d| d.data_dir().join(JsonFileStore::DEFAULT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(JsonFileStore::DEFAULT_FILE_NAME))
}
