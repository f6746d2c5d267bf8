//! End-to-end: live HTTP adapters against the replica router

use std::sync::Arc;
use std::time::Duration;

use metaverse::domain::entity::SessionPhase;
use metaverse::domain::port::IdentityProvider;
use metaverse::models::Principal;
use metaverse::presentation::ReplicaState;
use metaverse::{
    HttpActor, HttpIdentityProvider, InMemoryActor, MetaverseConfig, MetaverseError,
    SessionManager, replica_router,
};

type LiveManager = SessionManager<HttpIdentityProvider, HttpActor>;

async fn spawn_replica() -> String {
    let state = ReplicaState::new(
        InMemoryActor::with_demo_worlds().unwrap(),
        Duration::from_secs(3600),
    );
    let app = replica_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn config(identity_url: &str, service_address: &str, strict_mode: bool) -> MetaverseConfig {
    MetaverseConfig {
        identity_provider_url: identity_url.to_string(),
        service_address: service_address.to_string(),
        strict_mode,
        request_timeout: Duration::from_secs(2),
        login_timeout: Duration::from_secs(5),
        ..MetaverseConfig::development()
    }
}

fn principal(raw: &str) -> Principal {
    Principal::parse(raw).unwrap()
}

fn live_manager(config: MetaverseConfig, who: &str) -> LiveManager {
    let identity = HttpIdentityProvider::from_config(&config)
        .unwrap()
        .with_principal_hint(principal(who));
    let actor = HttpActor::from_config(&config).unwrap();
    SessionManager::new(Arc::new(identity), Arc::new(actor), config)
}

#[tokio::test]
async fn test_full_session_over_http() {
    let base = spawn_replica().await;
    let manager = live_manager(config(&base, &base, true), "alice");

    assert_eq!(manager.init().await.phase, SessionPhase::Unauthenticated);
    assert!(manager.login().await);
    assert_eq!(manager.principal().await, Some(principal("alice")));

    let cache = manager.cache();
    assert_eq!(cache.all_worlds().await.len(), 2);

    let avatar = cache.create_avatar("Neo", "#00FFFF", "glasses").await.unwrap();
    assert_eq!(avatar.id.as_str(), "avatar_1");
    assert_eq!(avatar.owner, principal("alice"));

    let ticket = cache
        .mint_ticket("Conf2025", 1_735_689_600_000, "VIP")
        .await
        .unwrap();
    assert_eq!(ticket.id.as_str(), "ticket_1");
    assert!(!ticket.is_used);

    let world = cache.create_vr_world("Garden", "A quiet garden").await.unwrap();
    assert_eq!(world.id.as_str(), "vr_world_3");
    assert_eq!(cache.my_worlds().await, vec![world]);

    assert!(cache.join_vr_world("vr_world_1").await.unwrap());
    let plaza = cache
        .all_worlds()
        .await
        .into_iter()
        .find(|w| w.id.as_str() == "vr_world_1")
        .unwrap();
    assert!(plaza.has_participant(&principal("alice")));
    assert_eq!(cache.all_worlds().await.len(), 3);

    assert_eq!(manager.gateway().whoami().await.unwrap(), principal("alice"));

    manager.logout().await;
    assert_eq!(manager.session().await.phase, SessionPhase::Unauthenticated);
    assert!(cache.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_stored_delegation_restores_session() {
    let base = spawn_replica().await;
    let first = live_manager(config(&base, &base, true), "alice");
    first.init().await;
    assert!(first.login().await);
    first
        .cache()
        .mint_ticket("Conf2025", 1_735_689_600_000, "VIP")
        .await
        .unwrap();
    let delegation = first.context().delegation().await.unwrap();

    // A second client picking up the same delegation
    let config = config(&base, &base, true);
    let identity = HttpIdentityProvider::from_config(&config)
        .unwrap()
        .with_delegation(delegation.clone());
    let actor = HttpActor::from_config(&config).unwrap();
    let second = SessionManager::new(Arc::new(identity), Arc::new(actor), config.clone());

    let snapshot = second.init().await;
    assert!(snapshot.is_authenticated);
    assert_eq!(second.cache().tickets().await.len(), 1);

    // Once revoked, the stored delegation no longer restores anything
    first.logout().await;
    let identity = HttpIdentityProvider::from_config(&config)
        .unwrap()
        .with_delegation(delegation);
    assert!(identity.probe().await.unwrap().is_none());
    assert!(identity.stored().await.is_none());
}

#[tokio::test]
async fn test_revoked_credential_is_never_masked() {
    let base = spawn_replica().await;
    let config = config(&base, &base, false);
    let manager = live_manager(config.clone(), "alice");
    manager.init().await;
    assert!(manager.login().await);

    let delegation = manager.context().delegation().await.unwrap();
    let other = HttpIdentityProvider::from_config(&config).unwrap();
    other.logout(&delegation.credential).await.unwrap();

    let err = manager.gateway().get_tickets().await.unwrap_err();
    assert!(matches!(err, MetaverseError::Unauthenticated));
    // Local session is only ended by an explicit logout
    assert!(manager.session().await.is_authenticated);
}

#[tokio::test]
async fn test_unreachable_service_strict_and_fallback() {
    let identity_base = spawn_replica().await;
    let service_base = dead_address().await;

    let strict = live_manager(config(&identity_base, &service_base, true), "alice");
    strict.init().await;
    assert!(strict.login().await);
    let err = strict
        .cache()
        .mint_ticket("Conf2025", 1_735_689_600_000, "VIP")
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(strict.cache().tickets().await.is_empty());

    let lenient = live_manager(config(&identity_base, &service_base, false), "bob");
    lenient.init().await;
    assert!(lenient.login().await);
    let ticket = lenient
        .cache()
        .mint_ticket("Conf2025", 1_735_689_600_000, "VIP")
        .await
        .unwrap();
    assert_eq!(ticket.event_name.as_str(), "Conf2025");
    assert_eq!(ticket.ticket_type.as_str(), "VIP");
    assert_eq!(ticket.owner, principal("bob"));
    assert_eq!(lenient.cache().tickets().await, vec![ticket]);
}

#[tokio::test]
async fn test_unreachable_identity_provider() {
    let identity_base = dead_address().await;
    let manager = live_manager(config(&identity_base, &identity_base, true), "alice");

    assert_eq!(manager.init().await.phase, SessionPhase::Unauthenticated);
    assert!(!manager.login().await);
    assert!(manager.principal().await.is_none());
}
