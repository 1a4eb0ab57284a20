//! Collaborator seams for identity and persistence
//!
//! The engine never talks to a database or a session layer directly; hosts
//! hand it these capabilities at construction. [`MemoryAclStore`] is a
//! complete reference implementation backing the test suites and small
//! deployments.

use crate::error::Result;
use crate::types::{Principal, Role, Route};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

pub mod memory;

pub use memory::MemoryAclStore;

/// Supplies the acting principal from the host's identity layer.
///
/// Implemented for plain closures, so
/// `move || Ok(Some(user.clone() as _))` is enough for most hosts.
pub trait PrincipalLoader: Send + Sync {
    fn load(&self) -> Result<Option<Arc<dyn Principal>>>;
}

impl<F> PrincipalLoader for F
where
    F: Fn() -> Result<Option<Arc<dyn Principal>>> + Send + Sync,
{
    fn load(&self) -> Result<Option<Arc<dyn Principal>>> {
        (self)()
    }
}

/// Role lookups, required in both permission-source modes.
///
/// All results are pre-filtered to active entries: an implementation must
/// apply the soft-delete rule to roles and to the user-role mappings it
/// joins through.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Names of the principal's active roles, joined through active
    /// user-role mappings
    async fn roles_of(&self, principal_id: &str) -> Result<HashSet<String>>;

    /// Look up an active role by its unique name
    async fn role_by_name(&self, name: &str) -> Result<Option<Role>>;
}

/// Route lookups, required in relational mode only.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Active routes for the canonical method reachable from any of the
    /// named roles, joined through active role-route mappings with
    /// hierarchy inheritance already applied
    async fn routes_for(&self, method: &str, role_names: &HashSet<String>) -> Result<Vec<Route>>;
}
