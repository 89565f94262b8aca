//! Package identity and the values the resolver hands back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A package as seen by one manager.
///
/// The manager is referenced by name only, so a package never keeps its
/// manager alive. Packages are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    id: String,
    name: Option<String>,
    version: String,
    manager: String,
}

impl Package {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        manager: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            version: version.into(),
            manager: manager.into(),
        }
    }

    /// Attach a human-readable display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stable identifier, unique within the manager's namespace.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the manager this package belongs to.
    pub fn manager(&self) -> &str {
        &self.manager
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.id, self.version, self.manager)
    }
}

/// Normalise a package id into the key used by icon databases.
///
/// Lowercases the id and maps spaces, underscores and dots to `-`.
pub fn normalize_icon_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '_' | '.' => '-',
            other => other,
        })
        .collect()
}

/// Details of a package, filled in place by its manager.
///
/// Owned by the caller. Only the manager writes the metadata fields; the
/// resolver flips `is_populated` once a native fetch succeeds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageDetails {
    pub package: Option<Package>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub author: Option<String>,
    pub homepage_url: Option<Url>,
    pub license: Option<String>,
    pub license_url: Option<Url>,
    pub installer_url: Option<Url>,
    pub installer_hash: Option<String>,
    pub installer_type: Option<String>,
    pub installer_size: Option<u64>,
    pub manifest_url: Option<Url>,
    pub update_date: Option<String>,
    pub release_notes: Option<String>,
    pub release_notes_url: Option<Url>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub is_populated: bool,
}

impl PackageDetails {
    /// An empty sink for the given package.
    pub fn new(package: Package) -> Self {
        Self {
            package: Some(package),
            ..Default::default()
        }
    }
}

/// How a cached icon is checked for staleness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum IconValidation {
    /// Valid while the package stays at this version.
    Version(String),
    /// Valid while the downloaded bytes hash to this value.
    Checksum(String),
    /// Valid while the downloaded file has this size.
    Size(u64),
    /// Never revalidated.
    None,
}

/// An icon URL plus the key callers use to invalidate a cached copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheableIcon {
    pub url: Url,
    pub validation: IconValidation,
}

impl CacheableIcon {
    pub fn with_version(url: Url, version: impl Into<String>) -> Self {
        Self {
            url,
            validation: IconValidation::Version(version.into()),
        }
    }

    pub fn with_checksum(url: Url, checksum: impl Into<String>) -> Self {
        Self {
            url,
            validation: IconValidation::Checksum(checksum.into()),
        }
    }

    pub fn with_size(url: Url, size: u64) -> Self {
        Self {
            url,
            validation: IconValidation::Size(size),
        }
    }

    pub fn unversioned(url: Url) -> Self {
        Self {
            url,
            validation: IconValidation::None,
        }
    }

    /// The package version this icon was resolved for, if version-keyed.
    pub fn version(&self) -> Option<&str> {
        match &self.validation {
            IconValidation::Version(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// True when a version-keyed icon no longer matches the package version.
    pub fn is_stale_for(&self, package: &Package) -> bool {
        self.version().is_some_and(|v| v != package.version())
    }
}

impl fmt::Display for CacheableIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
