//! Remote Actor Gateway
//!
//! Session-gated access to the remote actor. Outside strict mode a
//! transport failure is masked: mutations return a locally synthesized
//! entity and queries return an empty result.
//!
//! The `fetch_*` reads never mask. Callers that keep state (the entity
//! cache) use them so an outage can't overwrite what they already hold.

use std::sync::Arc;

use kernel::id::{AvatarId, Id, TicketId, WorldId};
use platform::clock::now_ms;

use crate::application::context::SessionContext;
use crate::domain::entity::{
    avatar::{Avatar, AvatarDraft},
    ticket::{Ticket, TicketDraft},
    vr_world::{VrWorld, WorldDraft},
};
use crate::domain::port::RemoteActor;
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};

pub struct ActorGateway<A> {
    actor: Arc<A>,
    context: SessionContext,
    strict_mode: bool,
}

impl<A> ActorGateway<A>
where
    A: RemoteActor + Send + Sync + 'static,
{
    pub fn new(actor: Arc<A>, context: SessionContext, strict_mode: bool) -> Self {
        Self {
            actor,
            context,
            strict_mode,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }

    pub fn actor(&self) -> &Arc<A> {
        &self.actor
    }

    pub async fn create_avatar(&self, draft: &AvatarDraft) -> MetaverseResult<Option<Avatar>> {
        let caller = self.context.call_context().await?;
        let result = self.actor.create_avatar(&caller, draft).await;
        self.recover("create_avatar", result, || {
            Some(draft.clone().into_avatar(AvatarId::new(), caller.principal.clone()))
        })
    }

    pub async fn get_avatar(&self) -> MetaverseResult<Option<Avatar>> {
        let result = self.fetch_avatar().await;
        self.recover("get_avatar", result, || None)
    }

    pub async fn fetch_avatar(&self) -> MetaverseResult<Option<Avatar>> {
        let caller = self.context.call_context().await?;
        self.actor.get_avatar(&caller).await
    }

    pub async fn mint_ticket(&self, draft: &TicketDraft) -> MetaverseResult<Option<Ticket>> {
        let caller = self.context.call_context().await?;
        let result = self.actor.mint_ticket(&caller, draft).await;
        self.recover("mint_ticket", result, || {
            Some(draft.clone().into_ticket(TicketId::new(), caller.principal.clone()))
        })
    }

    pub async fn get_tickets(&self) -> MetaverseResult<Vec<Ticket>> {
        let result = self.fetch_tickets().await;
        self.recover("get_tickets", result, Vec::new)
    }

    pub async fn fetch_tickets(&self) -> MetaverseResult<Vec<Ticket>> {
        let caller = self.context.call_context().await?;
        self.actor.get_tickets(&caller).await
    }

    pub async fn create_vr_world(&self, draft: &WorldDraft) -> MetaverseResult<Option<VrWorld>> {
        let caller = self.context.call_context().await?;
        let result = self.actor.create_vr_world(&caller, draft).await;
        self.recover("create_vr_world", result, || {
            Some(VrWorld::new(
                Id::new(),
                draft.clone(),
                caller.principal.clone(),
                now_ms(),
            ))
        })
    }

    pub async fn get_all_vr_worlds(&self) -> MetaverseResult<Vec<VrWorld>> {
        let result = self.fetch_all_vr_worlds().await;
        self.recover("get_all_vr_worlds", result, Vec::new)
    }

    pub async fn fetch_all_vr_worlds(&self) -> MetaverseResult<Vec<VrWorld>> {
        let caller = self.context.call_context().await?;
        self.actor.get_all_vr_worlds(&caller).await
    }

    pub async fn get_user_vr_worlds(&self) -> MetaverseResult<Vec<VrWorld>> {
        let result = self.fetch_user_vr_worlds().await;
        self.recover("get_user_vr_worlds", result, Vec::new)
    }

    pub async fn fetch_user_vr_worlds(&self) -> MetaverseResult<Vec<VrWorld>> {
        let caller = self.context.call_context().await?;
        self.actor.get_user_vr_worlds(&caller).await
    }

    pub async fn join_vr_world(&self, world_id: &WorldId) -> MetaverseResult<bool> {
        let caller = self.context.call_context().await?;
        let result = self.actor.join_vr_world(&caller, world_id).await;
        self.recover("join_vr_world", result, || true)
    }

    pub async fn whoami(&self) -> MetaverseResult<Principal> {
        let caller = self.context.call_context().await?;
        let result = self.actor.whoami(&caller).await;
        self.recover("whoami", result, || caller.principal.clone())
    }

    /// Apply the fallback policy to a remote result.
    ///
    /// Only transport failures are eligible; everything else passes through.
    fn recover<T>(
        &self,
        operation: &'static str,
        result: MetaverseResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> MetaverseResult<T> {
        match result {
            Err(MetaverseError::Transport(e)) if !self.strict_mode => {
                tracing::warn!(
                    operation = operation,
                    error = %e,
                    "Remote call failed, using local fallback"
                );
                Ok(fallback())
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "Remote call failed");
                Err(e)
            }
            Ok(value) => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::delegation::{DelegatedCredential, Delegation};
    use crate::infra::memory_actor::InMemoryActor;

    async fn gateway(strict_mode: bool) -> (ActorGateway<InMemoryActor>, Arc<InMemoryActor>) {
        let actor = Arc::new(InMemoryActor::new());
        let context = SessionContext::new();
        context
            .authenticate(Delegation::new(
                Principal::parse("alice").unwrap(),
                DelegatedCredential::new("cred-alice"),
                u64::MAX,
            ))
            .await;
        (
            ActorGateway::new(actor.clone(), context, strict_mode),
            actor,
        )
    }

    #[tokio::test]
    async fn test_requires_session() {
        let actor = Arc::new(InMemoryActor::new());
        let gateway = ActorGateway::new(actor, SessionContext::new(), false);

        // Never masked, even outside strict mode
        assert!(matches!(
            gateway.get_tickets().await,
            Err(MetaverseError::Unauthenticated)
        ));
        assert!(matches!(
            gateway.whoami().await,
            Err(MetaverseError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_passes_through_remote_results() {
        let (gateway, _) = gateway(true).await;

        let draft = TicketDraft::new("Conf2025", 1_735_689_600_000, "VIP").unwrap();
        let ticket = gateway.mint_ticket(&draft).await.unwrap().unwrap();

        assert_eq!(ticket.id.as_str(), "ticket_1");
        assert_eq!(gateway.get_tickets().await.unwrap(), vec![ticket]);
        assert_eq!(gateway.whoami().await.unwrap().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_transport_errors() {
        let (gateway, actor) = gateway(true).await;
        actor.fail_transport(true);

        let draft = WorldDraft::new("Plaza", "A square").unwrap();
        let err = gateway.create_vr_world(&draft).await.unwrap_err();
        assert!(err.is_transport());
        assert!(gateway.get_all_vr_worlds().await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_fallback_synthesizes_mutations() {
        let (gateway, actor) = gateway(false).await;
        actor.fail_transport(true);

        let draft = WorldDraft::new("Plaza", "A square").unwrap();
        let world = gateway.create_vr_world(&draft).await.unwrap().unwrap();
        assert_eq!(world.creator.as_str(), "alice");
        assert_eq!(world.participants(), &[world.creator.clone()]);
        assert!(world.is_active);
        assert!(world.created_at_ms > 0);

        let draft = AvatarDraft::new("Neo", "#ff00ff", "mask").unwrap();
        let avatar = gateway.create_avatar(&draft).await.unwrap().unwrap();
        assert_eq!(avatar.owner.as_str(), "alice");
        assert_eq!(avatar.name.as_str(), "Neo");

        assert!(gateway.join_vr_world(&WorldId::from("nope")).await.unwrap());
        assert_eq!(gateway.whoami().await.unwrap().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_fallback_empties_queries() {
        let (gateway, actor) = gateway(false).await;
        let draft = TicketDraft::new("Conf2025", 1_735_689_600_000, "VIP").unwrap();
        gateway.mint_ticket(&draft).await.unwrap();

        actor.fail_transport(true);

        assert!(gateway.get_tickets().await.unwrap().is_empty());
        assert!(gateway.get_avatar().await.unwrap().is_none());
        assert!(gateway.get_user_vr_worlds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_never_masks() {
        let (gateway, actor) = gateway(false).await;
        actor.fail_transport(true);

        assert!(gateway.fetch_tickets().await.unwrap_err().is_transport());
        assert!(gateway.fetch_avatar().await.unwrap_err().is_transport());
        assert!(gateway.fetch_user_vr_worlds().await.unwrap_err().is_transport());
        assert!(gateway.fetch_all_vr_worlds().await.unwrap_err().is_transport());
    }
}
