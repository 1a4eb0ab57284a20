//! In-memory reference store
//!
//! Holds the five relational tables behind a [`tokio::sync::RwLock`] and
//! implements both store traits with the same join and soft-delete
//! semantics a database-backed host would use. The evaluation clock is
//! injected so expiry can be tested against a fixed instant.

use crate::error::Result;
use crate::hierarchy::RoleGraph;
use crate::method::MethodMap;
use crate::store::{RoleStore, RouteStore};
use crate::types::{
    Clock, Role, RoleId, RoleRouteMap, Route, RouteId, SoftDelete, SystemClock, UserRoleMap,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    roles: HashMap<RoleId, Role>,
    routes: HashMap<RouteId, Route>,
    user_roles: Vec<UserRoleMap>,
    role_routes: Vec<RoleRouteMap>,
}

/// In-memory role/route/mapping store
pub struct MemoryAclStore {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
}

impl MemoryAclStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            clock,
        }
    }

    pub async fn add_role(&self, role: Role) -> RoleId {
        let id = role.id;
        self.tables.write().await.roles.insert(id, role);
        id
    }

    pub async fn add_route(&self, route: Route) -> RouteId {
        let id = route.id;
        self.tables.write().await.routes.insert(id, route);
        id
    }

    /// Record a parent/child edge, keeping both sides of the relation in
    /// sync. Unknown ids are ignored.
    pub async fn link_parent(&self, parent: RoleId, child: RoleId) {
        let mut tables = self.tables.write().await;
        if let Some(role) = tables.roles.get_mut(&parent) {
            role.children.insert(child);
        }
        if let Some(role) = tables.roles.get_mut(&child) {
            role.parents.insert(parent);
        }
    }

    /// Grant a role to a principal; returns the mapping id
    pub async fn assign_role(&self, principal_id: &str, role: RoleId) -> Uuid {
        self.assign_role_until(principal_id, role, None).await
    }

    /// Grant a role with an expiry timestamp already set on the mapping
    pub async fn assign_role_until(
        &self,
        principal_id: &str,
        role: RoleId,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Uuid {
        let mut map = UserRoleMap::new(principal_id, role);
        map.deleted_at = deleted_at;
        let id = map.id;
        self.tables.write().await.user_roles.push(map);
        id
    }

    /// Permit a role to access a route; returns the mapping id
    pub async fn attach_route(&self, role: RoleId, route: RouteId) -> Uuid {
        self.attach_route_until(role, route, None).await
    }

    pub async fn attach_route_until(
        &self,
        role: RoleId,
        route: RouteId,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Uuid {
        let mut map = RoleRouteMap::new(role, route);
        map.deleted_at = deleted_at;
        let id = map.id;
        self.tables.write().await.role_routes.push(map);
        id
    }

    /// Snapshot of the active routing surface: pattern to the set of
    /// canonical methods it is registered under
    pub async fn route_index(&self, methods: &MethodMap) -> HashMap<String, HashSet<String>> {
        let now = self.clock.now();
        let tables = self.tables.read().await;

        let mut index: HashMap<String, HashSet<String>> = HashMap::new();
        for route in tables.routes.values().filter(|r| r.is_active(now)) {
            index
                .entry(route.pattern.clone())
                .or_default()
                .insert(methods.normalize(&route.method));
        }
        index
    }
}

impl Default for MemoryAclStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for MemoryAclStore {
    async fn roles_of(&self, principal_id: &str) -> Result<HashSet<String>> {
        let now = self.clock.now();
        let tables = self.tables.read().await;

        Ok(tables
            .user_roles
            .iter()
            .filter(|map| map.user_id == principal_id && map.is_active(now))
            .filter_map(|map| tables.roles.get(&map.role_id))
            .filter(|role| role.is_active(now))
            .map(|role| role.name.clone())
            .collect())
    }

    async fn role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let now = self.clock.now();
        let tables = self.tables.read().await;

        Ok(tables
            .roles
            .values()
            .find(|role| role.name == name && role.is_active(now))
            .cloned())
    }
}

#[async_trait]
impl RouteStore for MemoryAclStore {
    async fn routes_for(&self, method: &str, role_names: &HashSet<String>) -> Result<Vec<Route>> {
        let now = self.clock.now();
        let tables = self.tables.read().await;
        let graph = RoleGraph::new(&tables.roles, &tables.routes, &tables.role_routes);

        // Hierarchy inheritance first: each named role brings the routes of
        // its descendants along, then the method filter applies.
        let mut eligible: HashSet<RouteId> = HashSet::new();
        for role in tables
            .roles
            .values()
            .filter(|role| role_names.contains(&role.name) && role.is_active(now))
        {
            eligible.extend(graph.eligible_routes(role.id, now));
        }

        Ok(eligible
            .iter()
            .filter_map(|id| tables.routes.get(id))
            .filter(|route| route.method == method)
            .cloned()
            .collect())
    }
}
