//! Package manager abstraction.
//!
//! A manager is one package-source backend (winget, scoop, npm, ...). It
//! declares its [`Capabilities`] and implements the native metadata queries.
//! Capability gating, fallback lookups and failure classification live in
//! [`crate::resolver::DetailsResolver`], so implementations only answer the
//! raw question.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

use crate::capability::Capabilities;
use crate::package::{CacheableIcon, Package, PackageDetails, normalize_icon_id};

/// Trait for package-source backends.
///
/// The `*_native` methods are only ever called through the resolver, which
/// checks [`Capabilities`] first. A gated method whose capability is off may
/// simply return an empty value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Manager name, used in diagnostics.
    fn name(&self) -> &str;

    /// Capabilities, fixed for the lifetime of the manager.
    fn capabilities(&self) -> Capabilities;

    /// Key used to look up this package in an icon database.
    fn icon_id(&self, package: &Package) -> String {
        normalize_icon_id(package.id())
    }

    /// Fill `details` with everything the backend knows about its package.
    async fn fetch_details_native(&self, details: &mut PackageDetails) -> Result<()>;

    /// Versions available for the package, in backend order.
    async fn fetch_versions_native(&self, package: &Package) -> Result<Vec<String>>;

    /// The backend's own icon for the package, if it has one.
    async fn fetch_icon_native(&self, package: &Package) -> Result<Option<CacheableIcon>>;

    /// The backend's own screenshots for the package.
    async fn fetch_screenshots_native(&self, package: &Package) -> Result<Vec<Url>>;

    /// Where the package is installed on this machine.
    async fn fetch_install_location_native(&self, package: &Package) -> Result<Option<PathBuf>>;
}
