//! Manager-independent icon and screenshot lookup.
//!
//! The resolver consults a [`FallbackLookup`] only when a manager has no
//! native answer. [`IconDatabase`] is the in-memory implementation; how its
//! entries are obtained is up to the host application.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Read-only source of fallback icon and screenshot URLs.
#[cfg_attr(test, mockall::automock)]
pub trait FallbackLookup: Send + Sync {
    /// Icon URL for an icon id. An empty string means there is no entry.
    fn icon_url_for(&self, icon_id: &str) -> String;

    /// Candidate screenshot URLs for a package id. May contain blank entries.
    fn screenshot_urls_for(&self, id: &str) -> Vec<String>;
}

/// One entry of an [`IconDatabase`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IconEntry {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl IconEntry {
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            images: vec![],
        }
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }
}

/// Shared in-memory icon database.
///
/// Lookups take a read lock; [`IconDatabase::replace`] swaps the whole table
/// under a write lock so readers never observe a half-loaded state.
#[derive(Debug, Default)]
pub struct IconDatabase {
    entries: RwLock<HashMap<String, IconEntry>>,
}

impl IconDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, IconEntry)>,
        K: Into<String>,
    {
        Self {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Add or overwrite a single entry.
    pub fn insert(&self, key: impl Into<String>, entry: IconEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Replace every entry at once.
    pub fn replace(&self, entries: HashMap<String, IconEntry>) {
        debug!("Replacing icon database with {} entries", entries.len());
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = entries;
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FallbackLookup for IconDatabase {
    fn icon_url_for(&self, icon_id: &str) -> String {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(icon_id)
            .map(|e| e.icon.clone())
            .unwrap_or_default()
    }

    fn screenshot_urls_for(&self, id: &str) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|e| e.images.clone())
            .unwrap_or_default()
    }
}
