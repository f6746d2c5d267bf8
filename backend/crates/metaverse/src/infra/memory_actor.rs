//! In-memory Remote Actor
//!
//! Process-local stand-in for the remote service. Backs the local replica
//! and the test suite; transport failures can be injected on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::id::{AvatarId, TicketId, WorldId};
use platform::clock::now_ms;
use platform::transport::TransportError;
use tokio::sync::Mutex;

use crate::domain::entity::{
    avatar::{Avatar, AvatarDraft},
    ticket::{Ticket, TicketDraft},
    vr_world::{VrWorld, WorldDraft},
};
use crate::domain::port::{CallContext, RemoteActor};
use crate::domain::value_object::{NonBlank, Principal};
use crate::error::{MetaverseError, MetaverseResult};

const DAY_MS: u64 = 86_400_000;

/// Totals across every principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorStats {
    pub avatars: usize,
    pub tickets: usize,
    pub vr_worlds: usize,
}

/// Everything stored for one principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub principal: Principal,
    pub avatar: Option<Avatar>,
    pub tickets: Vec<Ticket>,
    /// Worlds created by this principal, active or not
    pub vr_worlds: Vec<VrWorld>,
}

#[derive(Debug, Default)]
struct ActorState {
    avatars: HashMap<Principal, Avatar>,
    tickets: Vec<Ticket>,
    worlds: Vec<VrWorld>,
    next_avatar: u64,
    next_ticket: u64,
    next_world: u64,
}

impl ActorState {
    fn next_world_id(&mut self) -> WorldId {
        self.next_world += 1;
        WorldId::from_string(format!("vr_world_{}", self.next_world))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryActor {
    state: Mutex<ActorState>,
    fail_transport: AtomicBool,
}

impl InMemoryActor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actor pre-seeded with the two showcase worlds
    pub fn with_demo_worlds() -> MetaverseResult<Self> {
        let user_1 = Principal::parse("user-1")?;
        let user_2 = Principal::parse("user-2")?;
        let now = now_ms();

        let mut state = ActorState::default();

        let id = state.next_world_id();
        state.worlds.push(VrWorld::restore(
            id,
            NonBlank::parse("world name", "Cyber Plaza")?,
            NonBlank::parse("world description", "A futuristic cyberpunk cityscape")?,
            user_1.clone(),
            now,
            true,
            vec![user_1, user_2.clone()],
        ));

        let id = state.next_world_id();
        state.worlds.push(VrWorld::restore(
            id,
            NonBlank::parse("world name", "Ocean Depths")?,
            NonBlank::parse("world description", "An underwater adventure world")?,
            user_2.clone(),
            now.saturating_sub(DAY_MS),
            true,
            vec![user_2],
        ));

        Ok(Self {
            state: Mutex::new(state),
            fail_transport: AtomicBool::new(false),
        })
    }

    /// Make every subsequent call fail at the transport level
    pub fn fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    /// Hide or re-show a world in the global listing; `false` if unknown
    pub async fn set_world_active(&self, world_id: &WorldId, active: bool) -> bool {
        let mut state = self.state.lock().await;
        match state.worlds.iter_mut().find(|w| &w.id == world_id) {
            Some(world) => {
                world.is_active = active;
                true
            }
            None => false,
        }
    }

    pub async fn stats(&self) -> ActorStats {
        let state = self.state.lock().await;
        ActorStats {
            avatars: state.avatars.len(),
            tickets: state.tickets.len(),
            vr_worlds: state.worlds.len(),
        }
    }

    /// Admin lookup; bypasses failure injection like `stats`
    pub async fn user_profile(&self, principal: &Principal) -> UserProfile {
        let state = self.state.lock().await;
        UserProfile {
            principal: principal.clone(),
            avatar: state.avatars.get(principal).cloned(),
            tickets: state
                .tickets
                .iter()
                .filter(|t| &t.owner == principal)
                .cloned()
                .collect(),
            vr_worlds: state
                .worlds
                .iter()
                .filter(|w| &w.creator == principal)
                .cloned()
                .collect(),
        }
    }

    fn check_transport(&self) -> MetaverseResult<()> {
        if self.fail_transport.load(Ordering::SeqCst) {
            Err(TransportError::Request("injected failure".to_string()).into())
        } else {
            Ok(())
        }
    }
}

impl RemoteActor for InMemoryActor {
    async fn create_avatar(
        &self,
        caller: &CallContext,
        draft: &AvatarDraft,
    ) -> MetaverseResult<Option<Avatar>> {
        self.check_transport()?;
        let mut state = self.state.lock().await;

        // Re-creation overwrites the record but keeps its id
        let id = match state.avatars.get(&caller.principal) {
            Some(existing) => existing.id.clone(),
            None => {
                state.next_avatar += 1;
                AvatarId::from_string(format!("avatar_{}", state.next_avatar))
            }
        };

        let avatar = draft.clone().into_avatar(id, caller.principal.clone());
        state.avatars.insert(caller.principal.clone(), avatar.clone());

        tracing::debug!(principal = %caller.principal, avatar_id = %avatar.id, "Avatar stored");
        Ok(Some(avatar))
    }

    async fn get_avatar(&self, caller: &CallContext) -> MetaverseResult<Option<Avatar>> {
        self.check_transport()?;
        let state = self.state.lock().await;
        Ok(state.avatars.get(&caller.principal).cloned())
    }

    async fn mint_ticket(
        &self,
        caller: &CallContext,
        draft: &TicketDraft,
    ) -> MetaverseResult<Option<Ticket>> {
        self.check_transport()?;
        let mut state = self.state.lock().await;

        state.next_ticket += 1;
        let id = TicketId::from_string(format!("ticket_{}", state.next_ticket));
        let ticket = draft.clone().into_ticket(id, caller.principal.clone());
        state.tickets.push(ticket.clone());

        tracing::debug!(principal = %caller.principal, ticket_id = %ticket.id, "Ticket minted");
        Ok(Some(ticket))
    }

    async fn get_tickets(&self, caller: &CallContext) -> MetaverseResult<Vec<Ticket>> {
        self.check_transport()?;
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .iter()
            .filter(|t| t.owner == caller.principal)
            .cloned()
            .collect())
    }

    async fn create_vr_world(
        &self,
        caller: &CallContext,
        draft: &WorldDraft,
    ) -> MetaverseResult<Option<VrWorld>> {
        self.check_transport()?;
        let mut state = self.state.lock().await;

        let id = state.next_world_id();
        let world = VrWorld::new(id, draft.clone(), caller.principal.clone(), now_ms());
        state.worlds.push(world.clone());

        tracing::debug!(principal = %caller.principal, world_id = %world.id, "VR world created");
        Ok(Some(world))
    }

    async fn get_all_vr_worlds(&self, _caller: &CallContext) -> MetaverseResult<Vec<VrWorld>> {
        self.check_transport()?;
        let state = self.state.lock().await;
        Ok(state.worlds.iter().filter(|w| w.is_active).cloned().collect())
    }

    async fn get_user_vr_worlds(&self, caller: &CallContext) -> MetaverseResult<Vec<VrWorld>> {
        self.check_transport()?;
        let state = self.state.lock().await;
        Ok(state
            .worlds
            .iter()
            .filter(|w| w.creator == caller.principal)
            .cloned()
            .collect())
    }

    async fn join_vr_world(&self, caller: &CallContext, world_id: &WorldId) -> MetaverseResult<bool> {
        self.check_transport()?;
        let mut state = self.state.lock().await;

        match state.worlds.iter_mut().find(|w| &w.id == world_id) {
            Some(world) => {
                if world.add_participant(&caller.principal) {
                    tracing::debug!(principal = %caller.principal, world_id = %world_id, "Joined VR world");
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn whoami(&self, caller: &CallContext) -> MetaverseResult<Principal> {
        self.check_transport()?;
        Ok(caller.principal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::delegation::DelegatedCredential;

    fn caller(principal: &str) -> CallContext {
        CallContext {
            principal: Principal::parse(principal).unwrap(),
            credential: DelegatedCredential::new(format!("cred-{principal}")),
        }
    }

    #[tokio::test]
    async fn test_avatar_recreation_keeps_id() {
        let actor = InMemoryActor::new();
        let alice = caller("alice");

        let first = actor
            .create_avatar(&alice, &AvatarDraft::new("Neo", "#00ffff", "none").unwrap())
            .await
            .unwrap()
            .unwrap();
        let second = actor
            .create_avatar(&alice, &AvatarDraft::new("Trinity", "#ff0000", "glasses").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name.as_str(), "Trinity");
        assert_eq!(actor.stats().await.avatars, 1);
        assert_eq!(actor.get_avatar(&alice).await.unwrap(), Some(second));
        assert_eq!(actor.get_avatar(&caller("bob")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_tickets_are_per_owner_and_sequential() {
        let actor = InMemoryActor::new();
        let draft = TicketDraft::new("Conf2025", 1_735_689_600_000, "general").unwrap();

        actor.mint_ticket(&caller("alice"), &draft).await.unwrap();
        actor.mint_ticket(&caller("bob"), &draft).await.unwrap();
        actor.mint_ticket(&caller("alice"), &draft).await.unwrap();

        let ids: Vec<_> = actor
            .get_tickets(&caller("alice"))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id.into_string())
            .collect();
        assert_eq!(ids, vec!["ticket_1", "ticket_3"]);
    }

    #[tokio::test]
    async fn test_world_listing_filters() {
        let actor = InMemoryActor::with_demo_worlds().unwrap();
        let alice = caller("alice");

        let created = actor
            .create_vr_world(&alice, &WorldDraft::new("Garden", "A quiet garden").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id.as_str(), "vr_world_3");

        assert_eq!(actor.get_all_vr_worlds(&alice).await.unwrap().len(), 3);
        assert_eq!(actor.get_user_vr_worlds(&alice).await.unwrap(), vec![created]);

        assert!(actor.set_world_active(&WorldId::from("vr_world_1"), false).await);
        let names: Vec<_> = actor
            .get_all_vr_worlds(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.name.into_string())
            .collect();
        assert_eq!(names, vec!["Ocean Depths", "Garden"]);
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let actor = InMemoryActor::with_demo_worlds().unwrap();
        let alice = caller("alice");
        let plaza = WorldId::from("vr_world_1");

        assert!(actor.join_vr_world(&alice, &plaza).await.unwrap());
        assert!(actor.join_vr_world(&alice, &plaza).await.unwrap());
        assert!(!actor.join_vr_world(&alice, &WorldId::from("vr_world_99")).await.unwrap());

        let worlds = actor.get_all_vr_worlds(&alice).await.unwrap();
        let participants: Vec<_> = worlds[0].participants().iter().map(|p| p.as_str()).collect();
        assert_eq!(participants, vec!["user-1", "user-2", "alice"]);
    }

    #[tokio::test]
    async fn test_user_profile_includes_inactive_worlds() {
        let actor = InMemoryActor::with_demo_worlds().unwrap();
        let user_2 = caller("user-2");
        let draft = TicketDraft::new("Conf2025", 1_735_689_600_000, "VIP").unwrap();
        actor.mint_ticket(&user_2, &draft).await.unwrap();
        actor.mint_ticket(&caller("alice"), &draft).await.unwrap();
        actor.set_world_active(&WorldId::from("vr_world_2"), false).await;
        actor.fail_transport(true);

        let profile = actor.user_profile(&user_2.principal).await;
        assert!(profile.avatar.is_none());
        assert_eq!(profile.tickets.len(), 1);
        assert_eq!(profile.tickets[0].id.as_str(), "ticket_1");
        assert_eq!(profile.vr_worlds.len(), 1);
        assert!(!profile.vr_worlds[0].is_active);
    }

    #[tokio::test]
    async fn test_injected_transport_failure() {
        let actor = InMemoryActor::new();
        actor.fail_transport(true);

        let err = actor.whoami(&caller("alice")).await.unwrap_err();
        assert!(err.is_transport());

        actor.fail_transport(false);
        assert_eq!(actor.whoami(&caller("alice")).await.unwrap().as_str(), "alice");
    }
}
