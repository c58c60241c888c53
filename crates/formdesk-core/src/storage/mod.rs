//! Storage abstraction for persistence.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::template::Template;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for template storage backends.
///
/// Implementations can store templates in memory or on the filesystem.
pub trait Storage: Send + Sync {
    /// Save a template under `id`, replacing any previous version.
    fn save(&self, id: &str, template: &Template) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a template.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>>;

    /// Delete a template. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all template IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a template exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn save(&self, id: &str, template: &Template) -> BoxFuture<'_, StorageResult<()>> {
        (**self).save(id, template)
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Template>> {
        (**self).load(id)
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        (**self).delete(id)
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        (**self).list()
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        (**self).exists(id)
    }
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
