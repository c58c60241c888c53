use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use dashmap::DashMap;
use formdesk_core::{FileStorage, LocalTemplateApi, MemoryStorage, Storage, StorageResult};

use crate::config::ServerConfig;

/// A stored upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Shared application state.
pub struct AppState {
    pub config: ServerConfig,
    /// Template operations over the configured storage backend.
    pub templates: LocalTemplateApi<Box<dyn Storage>>,
    /// Uploaded files by stored name.
    pub uploads: DashMap<String, Upload>,
    /// Bytes held by `uploads`, bounded by `config.upload_store_bytes`.
    upload_bytes: AtomicUsize,
}

impl AppState {
    /// State over the backend `config` selects: files under `data_dir`, or
    /// memory when unset.
    pub fn from_config(config: ServerConfig) -> StorageResult<Self> {
        let storage: Box<dyn Storage> = match &config.data_dir {
            Some(dir) => {
                tracing::info!("Storing templates in {}", dir.display());
                Box::new(FileStorage::new(dir.clone())?)
            }
            None => {
                tracing::info!("Storing templates in memory");
                Box::new(MemoryStorage::new())
            }
        };
        Ok(Self::with_storage(config, storage))
    }

    pub fn with_storage(config: ServerConfig, storage: Box<dyn Storage>) -> Self {
        Self {
            config,
            templates: LocalTemplateApi::new(storage),
            uploads: DashMap::new(),
            upload_bytes: AtomicUsize::new(0),
        }
    }

    /// Store an upload under `name`, or return `false` when it would push
    /// the store past its byte cap.
    pub fn store_upload(&self, name: String, upload: Upload) -> bool {
        let size = upload.bytes.len();
        let cap = self.config.upload_store_bytes;
        let reserved = self
            .upload_bytes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                used.checked_add(size).filter(|total| *total <= cap)
            });
        if reserved.is_err() {
            return false;
        }
        self.uploads.insert(name, upload);
        true
    }

    /// Bytes currently held by stored uploads.
    pub fn upload_bytes(&self) -> usize {
        self.upload_bytes.load(Ordering::SeqCst)
    }
}
