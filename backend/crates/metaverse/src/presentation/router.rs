//! Replica Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::presentation::handlers::{self, ReplicaState};
use crate::presentation::middleware::require_delegation;

/// Router serving the identity endpoints and the nine actor operations.
///
/// `/api/stats` and `/api/users/{principal}` are unauthenticated admin reads.
pub fn replica_router(state: ReplicaState) -> Router {
    let protected = Router::new()
        .route("/identity/session", get(handlers::session))
        .route("/identity/logout", post(handlers::logout))
        .route("/api/create_avatar", post(handlers::create_avatar))
        .route("/api/get_avatar", get(handlers::get_avatar))
        .route("/api/mint_ticket", post(handlers::mint_ticket))
        .route("/api/get_tickets", get(handlers::get_tickets))
        .route("/api/create_vr_world", post(handlers::create_vr_world))
        .route("/api/get_all_vr_worlds", get(handlers::get_all_vr_worlds))
        .route("/api/get_user_vr_worlds", get(handlers::get_user_vr_worlds))
        .route("/api/join_vr_world", post(handlers::join_vr_world))
        .route("/api/whoami", get(handlers::whoami))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_delegation,
        ));

    Router::new()
        .route("/identity/authorize", post(handlers::authorize))
        .route("/api/stats", get(handlers::stats))
        .route("/api/users/{principal}", get(handlers::user_profile))
        .merge(protected)
        .with_state(state)
}
