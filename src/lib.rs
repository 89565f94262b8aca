//! pkgmeta - capability-gated package metadata resolution.
//!
//! A [`DetailsResolver`] answers details, version, icon, screenshot and
//! install-location queries for any [`PackageManager`], asking the manager
//! only for what its [`Capabilities`] declare and filling the gaps from a
//! [`FallbackLookup`].

pub mod capability;
pub mod config;
pub mod fallback;
pub mod manager;
pub mod package;
pub mod resolver;
pub mod runtime;

pub use capability::Capabilities;
pub use config::{NativeFaultPolicy, ResolverOptions};
pub use fallback::{FallbackLookup, IconDatabase, IconEntry};
pub use manager::PackageManager;
pub use package::{CacheableIcon, IconValidation, Package, PackageDetails, normalize_icon_id};
pub use resolver::DetailsResolver;
pub use runtime::{RealRuntime, Runtime};
