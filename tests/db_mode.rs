//! Relational-mode end-to-end scenarios
//!
//! The static map is empty, so permissions come from the store: active
//! routes joined through active role-route mappings, with hierarchy
//! inheritance expanding each role to its descendants' routes.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rrbac::{
    AclConfig, AclEngine, AclError, MemoryAclStore, PatternMode, Role, Route, User,
};
use std::collections::HashSet;
use std::sync::Arc;

async fn relational_engine(store: Arc<MemoryAclStore>) -> AclEngine {
    AclEngine::builder()
        .config(AclConfig::default())
        .store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_role_grants_mapped_route_only() {
    let store = Arc::new(MemoryAclStore::new());
    let base = store.add_role(Role::new("base")).await;
    let route = store.add_route(Route::new("GET", "/covered_route")).await;
    store.attach_route(base, route).await;
    store.assign_role("user:u", base).await;

    let engine = relational_engine(store).await;
    let user = User::new("user:u", "u");

    assert!(engine
        .is_allowed("GET", "/covered_route", Some(&user))
        .await
        .unwrap());
    assert!(!engine
        .is_allowed("POST", "/covered_route", Some(&user))
        .await
        .unwrap());
    assert!(!engine
        .is_allowed("GET", "/other_route", Some(&user))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_anonymous_role_routes_apply_to_everyone() {
    let store = Arc::new(MemoryAclStore::new());
    let anon = store.add_role(Role::new("Anonymous")).await;
    let landing = store.add_route(Route::new("GET", "/landing")).await;
    store.attach_route(anon, landing).await;

    let member = store.add_role(Role::new("member")).await;
    store.assign_role("user:m", member).await;

    let engine = relational_engine(store).await;

    assert!(engine.is_allowed("GET", "/landing", None).await.unwrap());
    let user = User::new("user:m", "m");
    assert!(engine
        .is_allowed("GET", "/landing", Some(&user))
        .await
        .unwrap());
    assert!(!engine.is_allowed("POST", "/landing", None).await.unwrap());
}

#[tokio::test]
async fn test_expired_user_role_mapping_is_ignored() {
    let store = Arc::new(MemoryAclStore::new());
    let base = store.add_role(Role::new("base")).await;
    let route = store.add_route(Route::new("GET", "/covered_route")).await;
    store.attach_route(base, route).await;

    let now = Utc::now();
    store
        .assign_role_until("user:expired", base, Some(now - Duration::hours(1)))
        .await;
    store
        .assign_role_until("user:current", base, Some(now + Duration::hours(1)))
        .await;

    let engine = relational_engine(store).await;

    let expired = User::new("user:expired", "expired");
    assert!(!engine
        .is_allowed("GET", "/covered_route", Some(&expired))
        .await
        .unwrap());

    let current = User::new("user:current", "current");
    assert!(engine
        .is_allowed("GET", "/covered_route", Some(&current))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_expired_role_route_mapping_is_ignored() {
    let store = Arc::new(MemoryAclStore::new());
    let base = store.add_role(Role::new("base")).await;
    let route = store.add_route(Route::new("GET", "/covered_route")).await;
    store
        .attach_route_until(base, route, Some(Utc::now() - Duration::minutes(1)))
        .await;
    store.assign_role("user:u", base).await;

    let engine = relational_engine(store).await;
    let user = User::new("user:u", "u");
    assert!(!engine
        .is_allowed("GET", "/covered_route", Some(&user))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_soft_deleted_role_is_ignored() {
    let store = Arc::new(MemoryAclStore::new());
    let gone = store
        .add_role(Role::new("gone").with_deleted_at(Utc::now() - Duration::days(1)))
        .await;
    let route = store.add_route(Route::new("GET", "/covered_route")).await;
    store.attach_route(gone, route).await;
    store.assign_role("user:u", gone).await;

    let engine = relational_engine(store).await;
    let user = User::new("user:u", "u");
    assert!(!engine
        .is_allowed("GET", "/covered_route", Some(&user))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_manager_inherits_worker_routes() {
    let store = Arc::new(MemoryAclStore::new());
    let worker = store.add_role(Role::new("worker")).await;
    let manager = store.add_role(Role::new("manager")).await;
    store.link_parent(manager, worker).await;

    let w_route = store.add_route(Route::new("GET", "/w")).await;
    let m_route = store.add_route(Route::new("GET", "/m")).await;
    store.attach_route(worker, w_route).await;
    store.attach_route(manager, m_route).await;

    store.assign_role("user:manager", manager).await;
    store.assign_role("user:worker", worker).await;

    let engine = relational_engine(store).await;

    // The manager reaches both its own route and the worker's
    let boss = User::new("user:manager", "manager");
    assert!(engine.is_allowed("GET", "/w", Some(&boss)).await.unwrap());
    assert!(engine.is_allowed("GET", "/m", Some(&boss)).await.unwrap());

    // Inheritance does not flow upward
    let worker = User::new("user:worker", "worker");
    assert!(engine.is_allowed("GET", "/w", Some(&worker)).await.unwrap());
    assert!(!engine.is_allowed("GET", "/m", Some(&worker)).await.unwrap());
}

#[tokio::test]
async fn test_role_cycle_terminates_and_grants() {
    let store = Arc::new(MemoryAclStore::new());
    let a = store.add_role(Role::new("a")).await;
    let b = store.add_role(Role::new("b")).await;
    // Both directions: the stored graph has a cycle
    store.link_parent(a, b).await;
    store.link_parent(b, a).await;

    let route_a = store.add_route(Route::new("GET", "/ra")).await;
    let route_b = store.add_route(Route::new("GET", "/rb")).await;
    store.attach_route(a, route_a).await;
    store.attach_route(b, route_b).await;
    store.assign_role("user:u", a).await;

    let engine = relational_engine(store).await;
    let user = User::new("user:u", "u");

    assert!(engine.is_allowed("GET", "/ra", Some(&user)).await.unwrap());
    assert!(engine.is_allowed("GET", "/rb", Some(&user)).await.unwrap());
    assert!(!engine.is_allowed("GET", "/rc", Some(&user)).await.unwrap());
}

#[tokio::test]
async fn test_regex_route_patterns() {
    let store = Arc::new(MemoryAclStore::new());
    let base = store.add_role(Role::new("base")).await;
    let route = store
        .add_route(Route::new("GET", r"/covered_route/\d+"))
        .await;
    store.attach_route(base, route).await;
    store.assign_role("user:u", base).await;

    let config = AclConfig {
        pattern_mode: PatternMode::Regex,
        ..AclConfig::default()
    };
    let engine = AclEngine::builder()
        .config(config)
        .store(store)
        .build()
        .unwrap();

    let user = User::new("user:u", "u");
    assert!(engine
        .is_allowed("GET", "/covered_route/12", Some(&user))
        .await
        .unwrap());
    assert!(!engine
        .is_allowed("GET", "/covered_route/12/x", Some(&user))
        .await
        .unwrap());
    assert!(!engine
        .is_allowed("GET", "/covered_route/abc", Some(&user))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_method_alias_reaches_get_routes() {
    let store = Arc::new(MemoryAclStore::new());
    let base = store.add_role(Role::new("base")).await;
    let route = store.add_route(Route::new("GET", "/covered_route")).await;
    store.attach_route(base, route).await;
    store.assign_role("user:u", base).await;

    let engine = relational_engine(store).await;
    let user = User::new("user:u", "u");

    assert!(engine
        .is_allowed("HEAD", "/covered_route", Some(&user))
        .await
        .unwrap());
    assert!(engine
        .is_allowed("OPTIONS", "/covered_route", Some(&user))
        .await
        .unwrap());
}

/// Store whose reads always fail, standing in for an unreachable database
struct UnreachableStore;

#[async_trait]
impl rrbac::RoleStore for UnreachableStore {
    async fn roles_of(&self, _: &str) -> rrbac::Result<HashSet<String>> {
        Err(AclError::Store("connection refused".to_string()))
    }

    async fn role_by_name(&self, _: &str) -> rrbac::Result<Option<Role>> {
        Err(AclError::Store("connection refused".to_string()))
    }
}

#[async_trait]
impl rrbac::RouteStore for UnreachableStore {
    async fn routes_for(&self, _: &str, _: &HashSet<String>) -> rrbac::Result<Vec<Route>> {
        Err(AclError::Store("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_failure_is_an_error_not_a_denial() {
    let engine = AclEngine::builder()
        .config(AclConfig::default())
        .store(Arc::new(UnreachableStore))
        .build()
        .unwrap();

    let user = User::new("user:u", "u");
    let result = engine.is_allowed("GET", "/covered_route", Some(&user)).await;
    assert!(matches!(result, Err(AclError::Store(_))));

    // Anonymous evaluation still consults the route store and fails the
    // same way; the engine never converts this into Ok(false)
    let result = engine.is_allowed("GET", "/covered_route", None).await;
    assert!(matches!(result, Err(AclError::Store(_))));
}
