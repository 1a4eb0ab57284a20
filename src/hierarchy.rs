//! Role hierarchy traversal
//!
//! Ancestors climb parent edges; eligible routes descend child edges and
//! union the routes attached along the way, modeling "a manager inherits a
//! subordinate's access". Both walks are breadth-first over active roles
//! with an explicit visited set: the stored graph is meant to be a DAG but
//! nothing enforces that, so a cycle must neither loop nor double-count a
//! route. Each query is O(V+E).

use crate::types::{Role, RoleId, RoleRouteMap, Route, RouteId, SoftDelete};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};

/// Read-only view over a role set, its routes, and the role-route
/// attachments, all keyed for traversal.
///
/// Borrowed rather than owned: the relational store builds one per query
/// from whatever snapshot it holds, and the view never outlives it.
pub struct RoleGraph<'a> {
    roles: &'a HashMap<RoleId, Role>,
    routes: &'a HashMap<RouteId, Route>,
    attachments: &'a [RoleRouteMap],
}

impl<'a> RoleGraph<'a> {
    pub fn new(
        roles: &'a HashMap<RoleId, Role>,
        routes: &'a HashMap<RouteId, Route>,
        attachments: &'a [RoleRouteMap],
    ) -> Self {
        Self {
            roles,
            routes,
            attachments,
        }
    }

    fn active(&self, id: &RoleId, now: DateTime<Utc>) -> Option<&'a Role> {
        self.roles.get(id).filter(|role| role.is_active(now))
    }

    /// Transitive closure of "parent of", excluding `start` itself and any
    /// inactive role. An inactive role also blocks traversal through it.
    pub fn ancestors(&self, start: RoleId, now: DateTime<Utc>) -> HashSet<RoleId> {
        self.closure(start, now, |role| &role.parents)
    }

    /// Transitive closure of "child of", same exclusions as [`ancestors`].
    ///
    /// [`ancestors`]: RoleGraph::ancestors
    pub fn descendants(&self, start: RoleId, now: DateTime<Utc>) -> HashSet<RoleId> {
        self.closure(start, now, |role| &role.children)
    }

    /// Routes the role may access: its own active attachments plus those of
    /// every active descendant. An inactive start role is eligible for
    /// nothing.
    pub fn eligible_routes(&self, start: RoleId, now: DateTime<Utc>) -> HashSet<RouteId> {
        if self.active(&start, now).is_none() {
            return HashSet::new();
        }

        let mut routes = self.attached_routes(start, now);
        for descendant in self.descendants(start, now) {
            routes.extend(self.attached_routes(descendant, now));
        }
        routes
    }

    /// Active routes directly attached to one role through active mappings
    fn attached_routes(&self, role: RoleId, now: DateTime<Utc>) -> HashSet<RouteId> {
        self.attachments
            .iter()
            .filter(|map| map.role_id == role && map.is_active(now))
            .filter(|map| {
                self.routes
                    .get(&map.route_id)
                    .is_some_and(|route| route.is_active(now))
            })
            .map(|map| map.route_id)
            .collect()
    }

    fn closure<F>(&self, start: RoleId, now: DateTime<Utc>, edges: F) -> HashSet<RoleId>
    where
        F: Fn(&Role) -> &HashSet<RoleId>,
    {
        let mut visited = HashSet::from([start]);
        let mut reachable = HashSet::new();
        let mut queue = VecDeque::new();

        if let Some(role) = self.active(&start, now) {
            queue.extend(edges(role).iter().copied());
        }

        while let Some(next) = queue.pop_front() {
            if !visited.insert(next) {
                continue;
            }
            // Inactive roles are neither reported nor expanded
            if let Some(role) = self.active(&next, now) {
                reachable.insert(next);
                queue.extend(edges(role).iter().copied());
            }
        }

        reachable
    }
}
