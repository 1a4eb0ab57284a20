//! HTTP method aliasing
//!
//! Some methods carry the same level of access: a client allowed to `GET` a
//! path may also `HEAD` or preflight it. The alias table folds those onto a
//! canonical method before any permission lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configurable alias table mapping equivalent methods onto a canonical one.
///
/// Unmapped methods pass through unchanged, so an unknown verb is simply
/// compared as-is. Normalization is pure and infallible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodMap {
    aliases: HashMap<String, String>,
}

impl MethodMap {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Table with no aliases: every method is already canonical
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Resolve a method to its canonical form
    pub fn normalize(&self, method: &str) -> String {
        self.aliases
            .get(method)
            .cloned()
            .unwrap_or_else(|| method.to_string())
    }
}

impl Default for MethodMap {
    /// `HEAD` and `OPTIONS` carry the same access level as `GET`
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert("HEAD".to_string(), "GET".to_string());
        aliases.insert("OPTIONS".to_string(), "GET".to_string());
        Self { aliases }
    }
}
