//! Resolution policy options.

use serde::{Deserialize, Serialize};

/// What to do when a native icon or screenshot query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeFaultPolicy {
    /// Log the failure and carry on as if the manager had no answer.
    #[default]
    Absent,
    /// Return the failure to the caller.
    Propagate,
}

/// Options for [`crate::resolver::DetailsResolver`].
///
/// Deserializable so host applications can embed it in their own config
/// files; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverOptions {
    /// Handling of native icon/screenshot failures.
    pub native_fault_policy: NativeFaultPolicy,
    /// Consult the fallback lookup when the manager has no answer.
    pub use_fallback_lookup: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            native_fault_policy: NativeFaultPolicy::Absent,
            use_fallback_lookup: true,
        }
    }
}

impl ResolverOptions {
    pub fn native_fault_policy(mut self, policy: NativeFaultPolicy) -> Self {
        self.native_fault_policy = policy;
        self
    }

    pub fn use_fallback_lookup(mut self, enabled: bool) -> Self {
        self.use_fallback_lookup = enabled;
        self
    }
}
