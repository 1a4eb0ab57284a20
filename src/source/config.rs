//! Static configuration permission source

use crate::error::Result;
use crate::source::PermissionSource;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Role name → method → set of path patterns, as supplied by the host's
/// configuration layer
pub type StaticRoleRouteMap = HashMap<String, HashMap<String, HashSet<String>>>;

/// Permission source backed by a static role→pattern map.
///
/// The map is read-only after construction; absent roles and absent methods
/// simply contribute no patterns.
pub struct ConfigSource {
    map: StaticRoleRouteMap,
}

impl ConfigSource {
    pub fn new(map: StaticRoleRouteMap) -> Self {
        Self { map }
    }

    /// Every pattern in the map, for load-time compilation checks
    pub fn all_patterns(&self) -> impl Iterator<Item = &str> {
        self.map
            .values()
            .flat_map(|methods| methods.values())
            .flatten()
            .map(String::as_str)
    }
}

#[async_trait]
impl PermissionSource for ConfigSource {
    async fn patterns_for(
        &self,
        method: &str,
        role_names: &HashSet<String>,
    ) -> Result<Vec<String>> {
        let mut patterns = HashSet::new();
        for role in role_names {
            if let Some(by_method) = self.map.get(role) {
                if let Some(set) = by_method.get(method) {
                    patterns.extend(set.iter().cloned());
                }
            }
        }
        Ok(patterns.into_iter().collect())
    }
}
