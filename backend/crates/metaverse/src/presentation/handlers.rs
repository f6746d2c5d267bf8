//! Replica Handlers
//!
//! Thin HTTP layer over `InMemoryActor` and `MemoryIdentityRegistry`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use kernel::id::WorldId;

use crate::domain::entity::{
    avatar::AvatarDraft, delegation::Delegation, ticket::TicketDraft, vr_world::WorldDraft,
};
use crate::domain::port::{CallContext, RemoteActor};
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};
use crate::infra::{memory_actor::InMemoryActor, memory_identity::MemoryIdentityRegistry};
use crate::presentation::dto::{
    AuthorizeRequest, AvatarDto, CreateAvatarRequest, CreateVrWorldRequest, DelegationDto,
    JoinVrWorldRequest, JoinVrWorldResponse, LogoutResponse, MintTicketRequest, StatsResponse,
    TicketDto, UserProfileResponse, VrWorldDto, WhoamiResponse,
};

/// Shared state for replica handlers
#[derive(Clone)]
pub struct ReplicaState {
    pub actor: Arc<InMemoryActor>,
    pub identities: Arc<MemoryIdentityRegistry>,
    /// Upper bound for issued delegations
    pub delegation_ttl: Duration,
}

impl ReplicaState {
    pub fn new(actor: InMemoryActor, delegation_ttl: Duration) -> Self {
        Self {
            actor: Arc::new(actor),
            identities: Arc::new(MemoryIdentityRegistry::new()),
            delegation_ttl,
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

/// POST /identity/authorize
pub async fn authorize(
    State(state): State<ReplicaState>,
    Json(req): Json<AuthorizeRequest>,
) -> MetaverseResult<Json<DelegationDto>> {
    if req.cancel {
        return Err(MetaverseError::LoginCancelled);
    }

    let principal = match req.principal.as_deref() {
        Some(raw) => Principal::parse(raw)?,
        None => Principal::generate(),
    };
    let ttl = req
        .max_time_to_live_ms
        .map(Duration::from_millis)
        .map_or(state.delegation_ttl, |ttl| ttl.min(state.delegation_ttl));

    let delegation = state.identities.issue(principal, ttl).await;
    Ok(Json(DelegationDto::from(&delegation)))
}

/// GET /identity/session
pub async fn session(Extension(delegation): Extension<Delegation>) -> Json<DelegationDto> {
    Json(DelegationDto::from(&delegation))
}

/// POST /identity/logout
pub async fn logout(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
) -> Json<LogoutResponse> {
    let revoked = state
        .identities
        .revoke(delegation.credential.expose())
        .await;

    tracing::info!(principal = %delegation.principal, "Delegation revoked");
    Json(LogoutResponse { revoked })
}

// ============================================================================
// Actor operations
// ============================================================================

/// POST /api/create_avatar
pub async fn create_avatar(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
    Json(req): Json<CreateAvatarRequest>,
) -> MetaverseResult<Json<Option<AvatarDto>>> {
    let draft = AvatarDraft::try_from(req)?;
    let avatar = state
        .actor
        .create_avatar(&CallContext::from(&delegation), &draft)
        .await?;
    Ok(Json(avatar.as_ref().map(AvatarDto::from)))
}

/// GET /api/get_avatar
pub async fn get_avatar(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
) -> MetaverseResult<Json<Option<AvatarDto>>> {
    let avatar = state
        .actor
        .get_avatar(&CallContext::from(&delegation))
        .await?;
    Ok(Json(avatar.as_ref().map(AvatarDto::from)))
}

/// POST /api/mint_ticket
pub async fn mint_ticket(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
    Json(req): Json<MintTicketRequest>,
) -> MetaverseResult<Json<Option<TicketDto>>> {
    let draft = TicketDraft::try_from(req)?;
    let ticket = state
        .actor
        .mint_ticket(&CallContext::from(&delegation), &draft)
        .await?;
    Ok(Json(ticket.as_ref().map(TicketDto::from)))
}

/// GET /api/get_tickets
pub async fn get_tickets(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
) -> MetaverseResult<Json<Vec<TicketDto>>> {
    let tickets = state
        .actor
        .get_tickets(&CallContext::from(&delegation))
        .await?;
    Ok(Json(tickets.iter().map(TicketDto::from).collect()))
}

/// POST /api/create_vr_world
pub async fn create_vr_world(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
    Json(req): Json<CreateVrWorldRequest>,
) -> MetaverseResult<Json<Option<VrWorldDto>>> {
    let draft = WorldDraft::try_from(req)?;
    let world = state
        .actor
        .create_vr_world(&CallContext::from(&delegation), &draft)
        .await?;
    Ok(Json(world.as_ref().map(VrWorldDto::from)))
}

/// GET /api/get_all_vr_worlds
pub async fn get_all_vr_worlds(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
) -> MetaverseResult<Json<Vec<VrWorldDto>>> {
    let worlds = state
        .actor
        .get_all_vr_worlds(&CallContext::from(&delegation))
        .await?;
    Ok(Json(worlds.iter().map(VrWorldDto::from).collect()))
}

/// GET /api/get_user_vr_worlds
pub async fn get_user_vr_worlds(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
) -> MetaverseResult<Json<Vec<VrWorldDto>>> {
    let worlds = state
        .actor
        .get_user_vr_worlds(&CallContext::from(&delegation))
        .await?;
    Ok(Json(worlds.iter().map(VrWorldDto::from).collect()))
}

/// POST /api/join_vr_world
pub async fn join_vr_world(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
    Json(req): Json<JoinVrWorldRequest>,
) -> MetaverseResult<Json<JoinVrWorldResponse>> {
    let joined = state
        .actor
        .join_vr_world(
            &CallContext::from(&delegation),
            &WorldId::from_string(req.world_id),
        )
        .await?;
    Ok(Json(JoinVrWorldResponse { joined }))
}

/// GET /api/whoami
pub async fn whoami(
    State(state): State<ReplicaState>,
    Extension(delegation): Extension<Delegation>,
) -> MetaverseResult<Json<WhoamiResponse>> {
    let principal = state.actor.whoami(&CallContext::from(&delegation)).await?;
    Ok(Json(WhoamiResponse {
        principal: principal.to_string(),
    }))
}

/// GET /api/stats
pub async fn stats(State(state): State<ReplicaState>) -> Json<StatsResponse> {
    let stats = state.actor.stats().await;
    let active_sessions = state.identities.active_sessions().await;
    Json(StatsResponse::new(stats, active_sessions))
}

/// GET /api/users/{principal}
pub async fn user_profile(
    State(state): State<ReplicaState>,
    Path(principal): Path<String>,
) -> MetaverseResult<Json<UserProfileResponse>> {
    let principal = Principal::parse(&principal)?;
    let profile = state.actor.user_profile(&principal).await;
    Ok(Json(UserProfileResponse::from(&profile)))
}
