//! Permission evaluator
//!
//! Orchestrates method normalization, role resolution, the permission
//! source, and the rule matcher into one decision call:
//!
//! ```text
//! (method, path, principal?)
//!     → MethodMap → RoleStore (+ anonymous role) → PermissionSource → RuleMatcher
//!     → allow on first matching pattern, deny on exhaustion
//! ```
//!
//! The engine is immutable after construction and every call is
//! side-effect free, so it can be shared across request handlers behind an
//! `Arc` without locking.

use crate::error::{AclError, Result};
use crate::matcher::{PatternMode, RuleMatcher};
use crate::method::MethodMap;
use crate::source::{ConfigSource, PermissionSource, RelationalSource, StaticRoleRouteMap};
use crate::store::{PrincipalLoader, RoleStore, RouteStore};
use crate::types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Engine configuration, fixed at construction.
///
/// A non-empty `static_role_route_map` selects config mode; an empty one
/// selects relational mode and makes a route store mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Role implicitly held by every principal, authenticated or not
    pub anonymous_role_name: String,

    /// Method alias table applied before any lookup
    pub method_alternates: MethodMap,

    /// Static role→method→patterns map; non-empty means config mode
    pub static_role_route_map: StaticRoleRouteMap,

    /// How patterns are compared against request paths
    pub pattern_mode: PatternMode,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            anonymous_role_name: "Anonymous".to_string(),
            method_alternates: MethodMap::default(),
            static_role_route_map: StaticRoleRouteMap::new(),
            pattern_mode: PatternMode::default(),
        }
    }
}

/// Callback fired when a checked request is denied; the default just logs.
/// Hosts override it to produce their 403-equivalent response.
pub type DenyHook = Arc<dyn Fn() + Send + Sync>;

/// Builder for [`AclEngine`]; collaborators are wired here and validated
/// once in [`build`](AclEngineBuilder::build), so a constructed engine can
/// never hit a missing-collaborator condition mid-request.
#[derive(Default)]
pub struct AclEngineBuilder {
    config: AclConfig,
    role_store: Option<Arc<dyn RoleStore>>,
    route_store: Option<Arc<dyn RouteStore>>,
    loader: Option<Arc<dyn PrincipalLoader>>,
    deny_hook: Option<DenyHook>,
}

impl AclEngineBuilder {
    pub fn config(mut self, config: AclConfig) -> Self {
        self.config = config;
        self
    }

    pub fn role_store(mut self, store: Arc<dyn RoleStore>) -> Self {
        self.role_store = Some(store);
        self
    }

    pub fn route_store(mut self, store: Arc<dyn RouteStore>) -> Self {
        self.route_store = Some(store);
        self
    }

    /// Wire one store as both the role and route collaborator
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: RoleStore + RouteStore + 'static,
    {
        self.role_store(store.clone()).route_store(store)
    }

    /// Identity-layer hook used by [`AclEngine::check`]
    pub fn principal_loader(mut self, loader: Arc<dyn PrincipalLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replace the default deny hook
    pub fn on_deny<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.deny_hook = Some(Arc::new(hook));
        self
    }

    /// Validate collaborators, pick the permission source, and compile the
    /// configured patterns.
    ///
    /// # Errors
    ///
    /// - [`AclError::Configuration`] when the role store is missing, or
    ///   when relational mode is selected without a route store
    /// - [`AclError::Pattern`] when a configured regex does not compile
    pub fn build(self) -> Result<AclEngine> {
        let config = self.config;

        let roles = self.role_store.ok_or_else(|| {
            AclError::Configuration("a role store is required in every mode".to_string())
        })?;

        let matcher = RuleMatcher::new(config.pattern_mode);

        let source: Arc<dyn PermissionSource> = if !config.static_role_route_map.is_empty() {
            let source = ConfigSource::new(config.static_role_route_map.clone());
            // Bad patterns are a load-time fault, not a per-request one
            matcher.precompile(source.all_patterns())?;
            Arc::new(source)
        } else {
            let store = self.route_store.ok_or_else(|| {
                AclError::Configuration(
                    "relational mode requires a route store (static map is empty)".to_string(),
                )
            })?;
            Arc::new(RelationalSource::new(store))
        };

        info!(
            mode = if config.static_role_route_map.is_empty() {
                "relational"
            } else {
                "config"
            },
            pattern_mode = ?config.pattern_mode,
            anonymous_role = %config.anonymous_role_name,
            "acl engine initialized"
        );

        Ok(AclEngine {
            config,
            matcher,
            source,
            roles,
            loader: self.loader,
            deny_hook: self
                .deny_hook
                .unwrap_or_else(|| Arc::new(|| warn!("access denied"))),
        })
    }
}

/// The decision engine
pub struct AclEngine {
    config: AclConfig,
    matcher: RuleMatcher,
    source: Arc<dyn PermissionSource>,
    roles: Arc<dyn RoleStore>,
    loader: Option<Arc<dyn PrincipalLoader>>,
    deny_hook: DenyHook,
}

impl AclEngine {
    pub fn builder() -> AclEngineBuilder {
        AclEngineBuilder::default()
    }

    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// May `principal` access `path` with `method`?
    ///
    /// A denial is the normal `Ok(false)` outcome. An `Err` always means
    /// the decision could not be made: collaborator failure or a
    /// configuration fault.
    pub async fn is_allowed(
        &self,
        method: &str,
        path: &str,
        principal: Option<&dyn Principal>,
    ) -> Result<bool> {
        let canonical = self.config.method_alternates.normalize(method);
        debug!(method, canonical = %canonical, path, "evaluating permission");

        let mut role_names = match principal {
            Some(p) if p.is_authenticated() => self.roles.roles_of(p.id()).await?,
            _ => HashSet::new(),
        };
        role_names.insert(self.config.anonymous_role_name.clone());
        debug!(roles = ?role_names, "resolved role set");

        let patterns = self.source.patterns_for(&canonical, &role_names).await?;
        for pattern in &patterns {
            if self.matcher.matches(pattern, path)? {
                debug!(pattern, "pattern matched, access granted");
                return Ok(true);
            }
        }

        debug!(
            candidates = patterns.len(),
            "no pattern matched, access denied"
        );
        Ok(false)
    }

    /// Evaluate the current principal, firing the deny hook on a `false`
    /// outcome. Mirrors a before-request authorization hook: the host calls
    /// this once per request with the configured principal loader doing the
    /// identity lookup.
    ///
    /// # Errors
    ///
    /// [`AclError::Configuration`] when no principal loader was wired, plus
    /// anything [`is_allowed`](AclEngine::is_allowed) can return.
    pub async fn check(&self, method: &str, path: &str) -> Result<bool> {
        let loader = self.loader.as_ref().ok_or_else(|| {
            AclError::Configuration("no principal loader configured".to_string())
        })?;

        let principal = loader.load()?;
        let allowed = self
            .is_allowed(method, path, principal.as_deref())
            .await?;

        if !allowed {
            (self.deny_hook)();
        }
        Ok(allowed)
    }
}
