//! Runtime abstraction for the filesystem checks the resolver performs.

use async_trait::async_trait;
use log::debug;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Whether `path` exists. Errors while probing count as "does not exist".
    async fn exists(&self, path: &Path) -> bool;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    #[tracing::instrument(skip(self))]
    async fn exists(&self, path: &Path) -> bool {
        match path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                debug!("Failed to probe {}: {}", path.display(), e);
                false
            }
        }
    }
}
