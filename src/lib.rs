//! # rrbac
//!
//! Role-route-based access control: given an HTTP method, a request path,
//! and the acting principal (or none), decide whether access is permitted.
//!
//! ## Features
//!
//! - **Dual permission sources**: a static role→pattern map from
//!   configuration, or a relational store of roles, routes, and their
//!   soft-deletable many-to-many mappings
//! - **Role hierarchy** with downward inheritance and cycle-safe traversal
//! - **Method aliasing** (`HEAD`/`OPTIONS` fold onto `GET` by default)
//! - **Exact or full-match regex** route patterns, compiled at load time
//! - **Async store seams** so any persistence layer can back the engine
//!
//! ## Example
//!
//! ```rust
//! use rrbac::{AclConfig, AclEngine, MemoryAclStore};
//! use std::collections::{HashMap, HashSet};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> rrbac::Result<()> {
//!     let mut map = HashMap::new();
//!     map.insert(
//!         "Anonymous".to_string(),
//!         HashMap::from([(
//!             "GET".to_string(),
//!             HashSet::from(["/public".to_string()]),
//!         )]),
//!     );
//!
//!     let config = AclConfig {
//!         static_role_route_map: map,
//!         ..AclConfig::default()
//!     };
//!
//!     let engine = AclEngine::builder()
//!         .config(config)
//!         .role_store(Arc::new(MemoryAclStore::new()))
//!         .build()?;
//!
//!     assert!(engine.is_allowed("GET", "/public", None).await?);
//!     assert!(!engine.is_allowed("POST", "/public", None).await?);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod matcher;
pub mod method;
pub mod source;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use engine::{AclConfig, AclEngine, AclEngineBuilder, DenyHook};
pub use error::{AclError, Result};
pub use hierarchy::RoleGraph;
pub use matcher::{PatternMode, RuleMatcher};
pub use method::MethodMap;
pub use source::{ConfigSource, PermissionSource, RelationalSource, StaticRoleRouteMap};
pub use store::{MemoryAclStore, PrincipalLoader, RoleStore, RouteStore};
pub use types::{
    Clock, FixedClock, Principal, Role, RoleId, RoleRouteMap, Route, RouteId, SoftDelete,
    SystemClock, User, UserRoleMap,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
