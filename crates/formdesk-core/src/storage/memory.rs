//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::template::Template;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    templates: RwLock<HashMap<String, Template>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, template: &Template) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let template = template.clone();
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(lock_error)?;
            templates.insert(id, template);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let id = id.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            templates
                .get(&id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(lock_error)?;
            templates.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            Ok(templates.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            Ok(templates.contains_key(&id))
        })
    }
}
