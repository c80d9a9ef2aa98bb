use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::ArchiveEngine;
use crate::engine_zip::ZipEngine;
use crate::policy::RetentionPolicy;
use crate::recency::RecencyStore;
use crate::recency::json_file::JsonFileStore;
use crate::recency::memory::MemoryStore;

pub enum EngineBackend {
    Zip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    JsonFile(PathBuf),
}

pub fn open_engine(backend: EngineBackend) -> Arc<dyn ArchiveEngine> {
    match backend {
        EngineBackend::Zip => Arc::new(ZipEngine::new()),
    }
}

pub fn open_store(backend: StoreBackend, policy: RetentionPolicy) -> Arc<dyn RecencyStore> {
    match backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(policy)),
        StoreBackend::JsonFile(path) => Arc::new(JsonFileStore::new(path, policy)),
    }
}
