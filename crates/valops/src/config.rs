//! Engine configuration.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Default number of compiled enum patterns kept per enum field.
pub const DEFAULT_REGEX_CACHE_CAPACITY: u64 = 500;

/// Settings for a [`Registry`](crate::Registry).
///
/// Every key is optional, so an empty YAML or JSON document is a valid
/// configuration:
///
/// ```yaml
/// loose_values: true
/// regex_cache_capacity: 200
/// aliases:
///   user_name: username
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accept string operators (`contains`, `startsWith`, `endsWith`,
    /// `matches`) on enum fields.
    pub loose_values: bool,
    /// Capacity of each enum backend's compiled pattern cache.
    pub regex_cache_capacity: u64,
    /// Alternate request parameter names, keyed by field name.
    pub aliases: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            loose_values: false,
            regex_cache_capacity: DEFAULT_REGEX_CACHE_CAPACITY,
            aliases: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Sets the loose value mode.
    pub fn with_loose_values(mut self, loose: bool) -> Self {
        self.loose_values = loose;
        self
    }

    /// Adds an alias for the field called `field`.
    pub fn with_alias(mut self, field: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.insert(field.into(), alias.into());
        self
    }
}

/// Settings shared between a registry and the backends it created.
#[derive(Debug)]
pub(crate) struct Settings {
    loose_values: AtomicBool,
    regex_cache_capacity: u64,
}

impl Settings {
    pub(crate) fn new(config: &EngineConfig) -> Self {
        Settings {
            loose_values: AtomicBool::new(config.loose_values),
            regex_cache_capacity: config.regex_cache_capacity,
        }
    }

    pub(crate) fn loose_values(&self) -> bool {
        self.loose_values.load(Ordering::Relaxed)
    }

    pub(crate) fn set_loose_values(&self, loose: bool) {
        self.loose_values.store(loose, Ordering::Relaxed);
    }

    pub(crate) fn regex_cache_capacity(&self) -> u64 {
        self.regex_cache_capacity
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new(&EngineConfig::default())
    }
}
