//! Core access-control entities and collaborator seams
//!
//! Entities mirror the relational model: roles with parent/child edges,
//! routes with a method and path pattern, and the two mapping entities that
//! carry their own soft-delete lifecycle. The engine only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique role identifier
pub type RoleId = Uuid;

/// Unique route identifier
pub type RouteId = Uuid;

/// Soft-delete filter applied uniformly to every entity and mapping.
///
/// An entry is active when `deleted_at` is unset (it never expires) or the
/// timestamp is still in the future (it has not expired yet). Inactive
/// entries are excluded from traversal and permission queries as if absent,
/// but stay stored so the host keeps its audit history.
pub trait SoftDelete {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.deleted_at() {
            None => true,
            Some(at) => at > now,
        }
    }
}

/// Evaluation wall clock, injected so decisions can run against a fixed
/// point in time in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for tests and decision replay
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Acting entity being authorized.
///
/// Hosts implement this on their own user type; the engine needs nothing
/// beyond an identifier and the authentication flag, checked here at the
/// trait boundary instead of by inspecting the concrete type.
pub trait Principal: Send + Sync {
    fn id(&self) -> &str;
    fn is_authenticated(&self) -> bool;
}

/// Role with hierarchy edges
///
/// `parents`/`children` form a directed graph that is intended to be
/// acyclic, though nothing in storage enforces that. Route attachment lives
/// in [`RoleRouteMap`] because the attachment has a lifecycle of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,

    /// Unique within a deployment
    pub name: String,

    #[serde(default)]
    pub parents: HashSet<RoleId>,

    #[serde(default)]
    pub children: HashSet<RoleId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parents: HashSet::new(),
            children: HashSet::new(),
            deleted_at: None,
        }
    }

    pub fn with_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }
}

impl SoftDelete for Role {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// Route: a path pattern guarded for one HTTP method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,

    /// Exact path or regular expression, depending on the deployment's
    /// pattern mode
    pub pattern: String,

    /// HTTP method this route entry covers (canonical form)
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Route {
    pub fn new(method: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pattern: pattern.into(),
            method: method.into(),
            deleted_at: None,
        }
    }

    pub fn with_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }
}

impl SoftDelete for Route {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// "This role may access this route", with its own lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRouteMap {
    pub id: Uuid,
    pub role_id: RoleId,
    pub route_id: RouteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RoleRouteMap {
    pub fn new(role_id: RoleId, route_id: RouteId) -> Self {
        Self {
            id: Uuid::new_v4(),
            role_id,
            route_id,
            deleted_at: None,
        }
    }

    pub fn with_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }
}

impl SoftDelete for RoleRouteMap {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// "This user holds this role", with its own lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleMap {
    pub id: Uuid,
    pub user_id: String,
    pub role_id: RoleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserRoleMap {
    pub fn new(user_id: impl Into<String>, role_id: RoleId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            role_id,
            deleted_at: None,
        }
    }

    pub fn with_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }
}

impl SoftDelete for UserRoleMap {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// Minimal authenticated principal, convenient for hosts without their own
/// user type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Principal for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_authenticated(&self) -> bool {
        true
    }
}
