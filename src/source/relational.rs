//! Relational-store permission source

use crate::error::Result;
use crate::source::PermissionSource;
use crate::store::RouteStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// Permission source backed by the host's route store.
///
/// The store performs the joins (active routes through active role-route
/// mappings, hierarchy already expanded); this adapter reduces the result
/// to the deduplicated pattern strings the matcher consumes. A store
/// failure propagates as [`AclError::Store`] and never turns into a
/// denial.
///
/// [`AclError::Store`]: crate::error::AclError::Store
pub struct RelationalSource {
    store: Arc<dyn RouteStore>,
}

impl RelationalSource {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PermissionSource for RelationalSource {
    async fn patterns_for(
        &self,
        method: &str,
        role_names: &HashSet<String>,
    ) -> Result<Vec<String>> {
        let routes = self.store.routes_for(method, role_names).await?;
        let patterns: HashSet<String> = routes.into_iter().map(|route| route.pattern).collect();
        Ok(patterns.into_iter().collect())
    }
}
