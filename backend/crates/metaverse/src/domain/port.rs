//! Ports
//!
//! Interfaces to the two external collaborators. Implementations live in
//! the infrastructure layer.

use std::time::Duration;

use kernel::id::WorldId;

use crate::domain::entity::{
    avatar::{Avatar, AvatarDraft},
    delegation::{DelegatedCredential, Delegation},
    ticket::{Ticket, TicketDraft},
    vr_world::{VrWorld, WorldDraft},
};
use crate::domain::value_object::Principal;
use crate::error::MetaverseResult;

/// Who is calling the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub principal: Principal,
    pub credential: DelegatedCredential,
}

impl From<&Delegation> for CallContext {
    fn from(delegation: &Delegation) -> Self {
        Self {
            principal: delegation.principal.clone(),
            credential: delegation.credential.clone(),
        }
    }
}

/// Remote actor: the nine operations exposed by the backend service
#[trait_variant::make(RemoteActor: Send)]
pub trait LocalRemoteActor {
    /// Create (or overwrite) the caller's avatar
    async fn create_avatar(
        &self,
        caller: &CallContext,
        draft: &AvatarDraft,
    ) -> MetaverseResult<Option<Avatar>>;

    async fn get_avatar(&self, caller: &CallContext) -> MetaverseResult<Option<Avatar>>;

    async fn mint_ticket(
        &self,
        caller: &CallContext,
        draft: &TicketDraft,
    ) -> MetaverseResult<Option<Ticket>>;

    /// Tickets owned by the caller, in mint order
    async fn get_tickets(&self, caller: &CallContext) -> MetaverseResult<Vec<Ticket>>;

    async fn create_vr_world(
        &self,
        caller: &CallContext,
        draft: &WorldDraft,
    ) -> MetaverseResult<Option<VrWorld>>;

    /// Every active world
    async fn get_all_vr_worlds(&self, caller: &CallContext) -> MetaverseResult<Vec<VrWorld>>;

    /// Worlds created by the caller
    async fn get_user_vr_worlds(&self, caller: &CallContext) -> MetaverseResult<Vec<VrWorld>>;

    /// `false` when the world does not exist
    async fn join_vr_world(&self, caller: &CallContext, world_id: &WorldId)
    -> MetaverseResult<bool>;

    async fn whoami(&self, caller: &CallContext) -> MetaverseResult<Principal>;
}

/// Delegated identity provider
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Existing, still-valid delegation from an earlier login, if any
    async fn probe(&self) -> MetaverseResult<Option<Delegation>>;

    /// Run the external authorization step.
    ///
    /// Resolves with `LoginCancelled` when the user abandons it.
    async fn login(&self, max_time_to_live: Duration) -> MetaverseResult<Delegation>;

    /// Invalidate the delegation on the provider side
    async fn logout(&self, credential: &DelegatedCredential) -> MetaverseResult<()>;
}
