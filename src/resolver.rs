//! Capability-gated resolution of package metadata.
//!
//! [`DetailsResolver`] wraps any [`PackageManager`] and decides, per query,
//! whether to ask the manager, fall back to a [`FallbackLookup`], or answer
//! empty. Expected gaps (unsupported capability, nothing found, stale path)
//! come back as `None` or an empty list and are only visible in the logs.

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use std::path::PathBuf;
use url::Url;

use crate::capability::Capabilities;
use crate::config::{NativeFaultPolicy, ResolverOptions};
use crate::fallback::FallbackLookup;
use crate::manager::PackageManager;
use crate::package::{CacheableIcon, Package, PackageDetails};
use crate::runtime::Runtime;

/// Resolves package metadata through one manager.
///
/// Holds only shared borrows, so a single resolver can serve concurrent
/// queries without locking.
pub struct DetailsResolver<'a, M, L, R>
where
    M: PackageManager + ?Sized,
    L: FallbackLookup + ?Sized,
    R: Runtime + ?Sized,
{
    manager: &'a M,
    lookup: &'a L,
    runtime: &'a R,
    options: ResolverOptions,
}

impl<'a, M, L, R> DetailsResolver<'a, M, L, R>
where
    M: PackageManager + ?Sized,
    L: FallbackLookup + ?Sized,
    R: Runtime + ?Sized,
{
    /// Create a resolver with default options.
    pub fn new(manager: &'a M, lookup: &'a L, runtime: &'a R) -> Self {
        Self::with_options(manager, lookup, runtime, ResolverOptions::default())
    }

    pub fn with_options(
        manager: &'a M,
        lookup: &'a L,
        runtime: &'a R,
        options: ResolverOptions,
    ) -> Self {
        Self {
            manager,
            lookup,
            runtime,
            options,
        }
    }

    pub fn manager(&self) -> &M {
        self.manager
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    fn capabilities(&self) -> Capabilities {
        self.manager.capabilities()
    }

    /// Populate `details` through the manager.
    ///
    /// There is no fallback for details; a native failure is returned as is.
    #[tracing::instrument(skip_all, fields(manager = self.manager.name()))]
    pub async fn fetch_details(&self, details: &mut PackageDetails) -> Result<()> {
        self.manager
            .fetch_details_native(details)
            .await
            .with_context(|| {
                let id = details.package.as_ref().map(Package::id).unwrap_or("<unknown>");
                format!(
                    "Failed to load details for package {} with manager {}",
                    id,
                    self.manager.name()
                )
            })?;
        details.is_populated = true;
        Ok(())
    }

    /// Versions the manager offers for `package`, in the manager's order.
    ///
    /// Returns an empty list without asking the manager when it does not
    /// support custom versions.
    #[tracing::instrument(skip_all, fields(package = %package))]
    pub async fn fetch_versions(&self, package: &Package) -> Result<Vec<String>> {
        if !self.capabilities().supports_custom_versions {
            warn!(
                "Manager {} does not support version retrieving, this method should not have been called",
                self.manager.name()
            );
            return Ok(vec![]);
        }

        let versions = self
            .manager
            .fetch_versions_native(package)
            .await
            .with_context(|| {
                format!(
                    "Failed to load versions for package {} with manager {}",
                    package.id(),
                    self.manager.name()
                )
            })?;
        info!(
            "Found {} versions for package {} on manager {}",
            versions.len(),
            package.id(),
            self.manager.name()
        );
        Ok(versions)
    }

    /// Icon for `package`: native first, then the fallback lookup.
    ///
    /// `Ok(None)` means the caller should show its default icon.
    #[tracing::instrument(skip_all, fields(package = %package))]
    pub async fn fetch_icon(&self, package: &Package) -> Result<Option<CacheableIcon>> {
        let mut icon = None;

        if self.capabilities().supports_custom_package_icons {
            match self.manager.fetch_icon_native(package).await {
                Ok(Some(native)) => icon = Some(native),
                Ok(None) => debug!(
                    "Manager {} did not find a native icon for {}",
                    self.manager.name(),
                    package.id()
                ),
                Err(e) => self.native_fault("icon", package, e)?,
            }
        } else {
            debug!("Manager {} does not support native icons", self.manager.name());
        }

        if icon.is_none() {
            icon = self.fallback_icon(package);
        }

        match icon {
            Some(icon) => {
                info!("Loaded icon with URL={} for package {}", icon, package.id());
                Ok(Some(icon))
            }
            None => {
                warn!(
                    "Icon for package {} was not found, returning default icon",
                    package.id()
                );
                Ok(None)
            }
        }
    }

    /// Screenshot URLs for `package`.
    ///
    /// Native and fallback results are never mixed: the fallback lookup is
    /// only consulted when the manager produced nothing.
    #[tracing::instrument(skip_all, fields(package = %package))]
    pub async fn fetch_screenshots(&self, package: &Package) -> Result<Vec<Url>> {
        let mut urls = Vec::new();

        if self.capabilities().supports_custom_package_screenshots {
            match self.manager.fetch_screenshots_native(package).await {
                Ok(native) => urls = native,
                Err(e) => self.native_fault("screenshots", package, e)?,
            }
        } else {
            debug!(
                "Manager {} does not support native screenshots",
                self.manager.name()
            );
        }

        if urls.is_empty() {
            urls = self.fallback_screenshots(package);
        }

        info!("Found {} screenshots for package {}", urls.len(), package.id());
        Ok(urls)
    }

    /// Install location of `package`, if the manager knows one and it exists.
    ///
    /// Never fails: native errors and stale paths are logged and reported
    /// as `None`.
    #[tracing::instrument(skip_all, fields(package = %package))]
    pub async fn fetch_install_location(&self, package: &Package) -> Option<PathBuf> {
        let path = match self.manager.fetch_install_location_native(package).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!(
                    "Manager {} reported no install location for package {}",
                    self.manager.name(),
                    package.id()
                );
                return None;
            }
            Err(e) => {
                error!(
                    "An error occurred while loading install location for package {} with manager {}: {:#}",
                    package.id(),
                    self.manager.name(),
                    e
                );
                return None;
            }
        };

        if !self.runtime.exists(&path).await {
            warn!(
                "Path \"{}\" returned by the package manager does not exist, ignoring install location for package {} with manager {}",
                path.display(),
                package.id(),
                self.manager.name()
            );
            return None;
        }

        Some(path)
    }

    /// Apply the configured policy to a failed native icon/screenshot query.
    fn native_fault(&self, what: &str, package: &Package, err: anyhow::Error) -> Result<()> {
        match self.options.native_fault_policy {
            NativeFaultPolicy::Propagate => Err(err.context(format!(
                "Failed to load native {} for package {} with manager {}",
                what,
                package.id(),
                self.manager.name()
            ))),
            NativeFaultPolicy::Absent => {
                error!(
                    "Failed to load native {} for package {} with manager {}, treating as no native answer: {:#}",
                    what,
                    package.id(),
                    self.manager.name(),
                    err
                );
                Ok(())
            }
        }
    }

    fn fallback_icon(&self, package: &Package) -> Option<CacheableIcon> {
        if !self.options.use_fallback_lookup {
            debug!("Fallback lookup disabled, skipping icon lookup for {}", package.id());
            return None;
        }

        let icon_id = self.manager.icon_id(package);
        let raw = self.lookup.icon_url_for(&icon_id);
        if raw.trim().is_empty() {
            debug!("No fallback icon for icon id {}", icon_id);
            return None;
        }

        match Url::parse(raw.trim()) {
            Ok(url) => Some(CacheableIcon::with_version(url, package.version())),
            Err(e) => {
                warn!("Ignoring invalid fallback icon URL {:?} for {}: {}", raw, icon_id, e);
                None
            }
        }
    }

    fn fallback_screenshots(&self, package: &Package) -> Vec<Url> {
        if !self.options.use_fallback_lookup {
            debug!(
                "Fallback lookup disabled, skipping screenshot lookup for {}",
                package.id()
            );
            return vec![];
        }

        self.lookup
            .screenshot_urls_for(package.id())
            .iter()
            .map(|raw| raw.trim())
            .filter(|raw| !raw.is_empty())
            .filter_map(|raw| match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(
                        "Ignoring invalid fallback screenshot URL {:?} for {}: {}",
                        raw,
                        package.id(),
                        e
                    );
                    None
                }
            })
            .collect()
    }
}
