//! Role-route permission sources
//!
//! The evaluator consults exactly one source, chosen at construction: a
//! static role→method→pattern map from configuration, or the relational
//! store. Both answer the same question, so the branch lives here as a
//! trait rather than as conditionals inside the evaluator.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

pub mod config;
pub mod relational;

pub use config::{ConfigSource, StaticRoleRouteMap};
pub use relational::RelationalSource;

/// One backing store of "which path patterns may this role reach with this
/// method".
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Candidate path patterns permitted for the canonical method and the
    /// resolved role-name set. Order is not significant; the first pattern
    /// to match the request path grants access.
    async fn patterns_for(&self, method: &str, role_names: &HashSet<String>)
        -> Result<Vec<String>>;
}
