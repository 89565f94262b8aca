//! Capability descriptor for package managers.

use serde::{Deserialize, Serialize};

/// Which metadata queries a manager can answer natively.
///
/// Each manager returns the same descriptor for its whole lifetime; the
/// resolver consults it before every gated native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Capabilities {
    pub supports_custom_versions: bool,
    pub supports_custom_package_icons: bool,
    pub supports_custom_package_screenshots: bool,
}

impl Capabilities {
    /// A manager with no native metadata support at all.
    pub const NONE: Capabilities = Capabilities {
        supports_custom_versions: false,
        supports_custom_package_icons: false,
        supports_custom_package_screenshots: false,
    };

    /// A manager that answers every gated query natively.
    pub const ALL: Capabilities = Capabilities {
        supports_custom_versions: true,
        supports_custom_package_icons: true,
        supports_custom_package_screenshots: true,
    };

    pub fn versions(mut self, supported: bool) -> Self {
        self.supports_custom_versions = supported;
        self
    }

    pub fn icons(mut self, supported: bool) -> Self {
        self.supports_custom_package_icons = supported;
        self
    }

    pub fn screenshots(mut self, supported: bool) -> Self {
        self.supports_custom_package_screenshots = supported;
        self
    }
}
