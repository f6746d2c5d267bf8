//! Replica Middleware
//!
//! Resolves the bearer credential of protected routes to a delegation.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::MetaverseError;
use crate::presentation::handlers::ReplicaState;

/// Reject requests without a live delegation; inserts `Delegation` as an extension
pub async fn require_delegation(
    State(state): State<ReplicaState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, MetaverseError> {
    let credential = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(MetaverseError::Unauthenticated)?;

    let delegation = state
        .identities
        .resolve(credential)
        .await
        .ok_or(MetaverseError::Unauthenticated)?;

    req.extensions_mut().insert(delegation);
    Ok(next.run(req).await)
}
