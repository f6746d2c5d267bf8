//! Domain Entity Cache
//!
//! Per-session copies of the caller's avatar, tickets and worlds.
//! Each entity type has its own lock, held across the remote call, so
//! mutations of one type are applied in call order.

use std::sync::Arc;

use kernel::id::WorldId;
use tokio::sync::Mutex;

use crate::application::context::SessionContext;
use crate::application::gateway::ActorGateway;
use crate::application::notice::{Notice, Notifier};
use crate::domain::entity::{
    avatar::{Avatar, AvatarDraft},
    ticket::{Ticket, TicketDraft},
    vr_world::{VrWorld, WorldDraft},
};
use crate::domain::port::RemoteActor;
use crate::domain::value_object::{NonBlank, Principal};
use crate::error::{MetaverseError, MetaverseResult};

#[derive(Debug, Default)]
struct WorldCache {
    /// Worlds created by the current principal
    mine: Vec<VrWorld>,
    /// Global listing of active worlds
    all: Vec<VrWorld>,
    /// Whether `all` reflects at least one successful listing
    loaded: bool,
}

impl WorldCache {
    fn add_participant(&mut self, world_id: &WorldId, principal: &Principal) {
        for world in self.mine.iter_mut().chain(self.all.iter_mut()) {
            if &world.id == world_id {
                world.add_participant(principal);
            }
        }
    }

    fn replace_listing(&mut self, listing: Vec<VrWorld>) {
        self.all = listing;
        self.loaded = true;
    }
}

/// Point-in-time copy of every cached collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub avatar: Option<Avatar>,
    pub tickets: Vec<Ticket>,
    pub my_worlds: Vec<VrWorld>,
    pub all_worlds: Vec<VrWorld>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.avatar.is_none()
            && self.tickets.is_empty()
            && self.my_worlds.is_empty()
            && self.all_worlds.is_empty()
    }
}

/// Outcome of `load_user_data`: fields that failed kept their previous value
#[derive(Debug, Default)]
pub struct LoadReport {
    pub failures: Vec<(&'static str, MetaverseError)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, field: &'static str, result: MetaverseResult<T>, slot: &mut T) {
        match result {
            Ok(value) => *slot = value,
            Err(e) => self.fail(field, e),
        }
    }

    fn fail(&mut self, field: &'static str, error: MetaverseError) {
        tracing::warn!(field = field, error = %error, "Failed to load user data field");
        self.failures.push((field, error));
    }
}

pub struct EntityCache<A> {
    gateway: Arc<ActorGateway<A>>,
    context: SessionContext,
    notifier: Notifier,
    avatar: Mutex<Option<Avatar>>,
    tickets: Mutex<Vec<Ticket>>,
    worlds: Mutex<WorldCache>,
}

impl<A> EntityCache<A>
where
    A: RemoteActor + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<ActorGateway<A>>, context: SessionContext, notifier: Notifier) -> Self {
        Self {
            gateway,
            context,
            notifier,
            avatar: Mutex::new(None),
            tickets: Mutex::new(Vec::new()),
            worlds: Mutex::new(WorldCache::default()),
        }
    }

    /// Fetch avatar, tickets, own worlds and the global listing concurrently.
    ///
    /// Each field is replaced independently; a failed read leaves that
    /// field as it was. Transport failures are reported here in both
    /// modes, never replaced by an empty result.
    pub async fn load_user_data(&self) -> MetaverseResult<LoadReport> {
        self.context.call_context().await?;
        let generation = self.context.generation().await;

        let mut avatar = self.avatar.lock().await;
        let mut tickets = self.tickets.lock().await;
        let mut worlds = self.worlds.lock().await;

        let (loaded_avatar, loaded_tickets, loaded_mine, loaded_all) = tokio::join!(
            self.gateway.fetch_avatar(),
            self.gateway.fetch_tickets(),
            self.gateway.fetch_user_vr_worlds(),
            self.gateway.fetch_all_vr_worlds(),
        );

        self.ensure_current("load_user_data", generation).await?;

        let mut report = LoadReport::default();
        report.record("avatar", loaded_avatar, &mut *avatar);
        report.record("tickets", loaded_tickets, &mut *tickets);
        report.record("my_worlds", loaded_mine, &mut worlds.mine);
        match loaded_all {
            Ok(listing) => worlds.replace_listing(listing),
            Err(e) => report.fail("all_worlds", e),
        }

        tracing::info!(
            avatar = avatar.is_some(),
            tickets = tickets.len(),
            my_worlds = worlds.mine.len(),
            all_worlds = worlds.all.len(),
            failures = report.failures.len(),
            "User data loaded"
        );

        Ok(report)
    }

    /// Create or overwrite the current principal's avatar
    pub async fn create_avatar(
        &self,
        name: &str,
        color: &str,
        accessory: &str,
    ) -> MetaverseResult<Avatar> {
        let outcome: MetaverseResult<Avatar> = async {
            let draft = AvatarDraft::new(name, color, accessory)?;

            let mut slot = self.avatar.lock().await;
            let generation = self.context.generation().await;
            let avatar = self
                .gateway
                .create_avatar(&draft)
                .await?
                .ok_or(MetaverseError::EmptyResult("create_avatar"))?;
            self.ensure_current("create_avatar", generation).await?;

            *slot = Some(avatar.clone());
            Ok(avatar)
        }
        .await;

        self.report("create_avatar", outcome)
    }

    /// Mint a ticket and append it to the cached list
    pub async fn mint_ticket(
        &self,
        event_name: &str,
        event_date: u64,
        ticket_type: &str,
    ) -> MetaverseResult<Ticket> {
        let outcome: MetaverseResult<Ticket> = async {
            let draft = TicketDraft::new(event_name, event_date, ticket_type)?;

            let mut tickets = self.tickets.lock().await;
            let generation = self.context.generation().await;
            let ticket = self
                .gateway
                .mint_ticket(&draft)
                .await?
                .ok_or(MetaverseError::EmptyResult("mint_ticket"))?;
            self.ensure_current("mint_ticket", generation).await?;

            tickets.push(ticket.clone());
            Ok(ticket)
        }
        .await;

        self.report("mint_ticket", outcome)
    }

    /// Create a world; it lands in both "my worlds" and the global listing
    pub async fn create_vr_world(&self, name: &str, description: &str) -> MetaverseResult<VrWorld> {
        let outcome: MetaverseResult<VrWorld> = async {
            let draft = WorldDraft::new(name, description)?;

            let mut worlds = self.worlds.lock().await;
            let generation = self.context.generation().await;
            let world = self
                .gateway
                .create_vr_world(&draft)
                .await?
                .ok_or(MetaverseError::EmptyResult("create_vr_world"))?;
            self.ensure_current("create_vr_world", generation).await?;

            worlds.mine.push(world.clone());
            worlds.all.retain(|w| w.id != world.id);
            worlds.all.push(world.clone());
            Ok(world)
        }
        .await;

        self.report("create_vr_world", outcome)
    }

    /// Join a world as the current principal.
    ///
    /// Returns `false` when the cache already shows the membership, in
    /// which case the remote is not called.
    pub async fn join_vr_world(&self, world_id: &str) -> MetaverseResult<bool> {
        let outcome: MetaverseResult<bool> = async {
            let world_id = WorldId::from_string(NonBlank::parse("world id", world_id)?.into_string());
            let principal = self
                .context
                .principal()
                .await
                .ok_or(MetaverseError::Unauthenticated)?;

            let mut worlds = self.worlds.lock().await;
            if worlds.loaded {
                match worlds.all.iter().find(|w| w.id == world_id) {
                    None => return Err(MetaverseError::NotFound(world_id.into_string())),
                    Some(world) if world.has_participant(&principal) => {
                        tracing::debug!(world_id = %world_id, "Already a participant");
                        return Ok(false);
                    }
                    Some(_) => {}
                }
            }

            let generation = self.context.generation().await;
            if !self.gateway.join_vr_world(&world_id).await? {
                return Err(MetaverseError::NotFound(world_id.into_string()));
            }
            self.ensure_current("join_vr_world", generation).await?;

            worlds.add_participant(&world_id, &principal);

            match self.gateway.fetch_all_vr_worlds().await {
                Ok(listing) if self.context.is_current(generation).await => {
                    worlds.replace_listing(listing);
                    // The listing may predate the join on the remote side
                    worlds.add_participant(&world_id, &principal);
                }
                Ok(_) => return Err(MetaverseError::SessionChanged("join_vr_world")),
                // Keep the listing we have
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to refresh world listing after join");
                }
            }

            tracing::info!(world_id = %world_id, principal = %principal, "Joined VR world");
            Ok(true)
        }
        .await;

        self.report("join_vr_world", outcome)
    }

    /// Reload the global world listing.
    ///
    /// Outside strict mode a transport failure returns the cached listing
    /// unchanged.
    pub async fn refresh_all_worlds(&self) -> MetaverseResult<Vec<VrWorld>> {
        let mut worlds = self.worlds.lock().await;
        let generation = self.context.generation().await;

        let listing = match self.gateway.fetch_all_vr_worlds().await {
            Ok(listing) => listing,
            Err(e) if e.is_transport() && !self.gateway.is_strict() => {
                tracing::warn!(error = %e, "World listing unavailable, keeping cached copy");
                return Ok(worlds.all.clone());
            }
            Err(e) => return Err(e),
        };
        self.ensure_current("refresh_all_worlds", generation).await?;

        worlds.replace_listing(listing.clone());
        Ok(listing)
    }

    pub async fn avatar(&self) -> Option<Avatar> {
        self.avatar.lock().await.clone()
    }

    pub async fn tickets(&self) -> Vec<Ticket> {
        self.tickets.lock().await.clone()
    }

    pub async fn my_worlds(&self) -> Vec<VrWorld> {
        self.worlds.lock().await.mine.clone()
    }

    pub async fn all_worlds(&self) -> Vec<VrWorld> {
        self.worlds.lock().await.all.clone()
    }

    pub async fn snapshot(&self) -> CacheSnapshot {
        let avatar = self.avatar.lock().await.clone();
        let tickets = self.tickets.lock().await.clone();
        let worlds = self.worlds.lock().await;

        CacheSnapshot {
            avatar,
            tickets,
            my_worlds: worlds.mine.clone(),
            all_worlds: worlds.all.clone(),
        }
    }

    /// Drop everything; called on logout
    pub async fn clear(&self) {
        *self.avatar.lock().await = None;
        self.tickets.lock().await.clear();
        *self.worlds.lock().await = WorldCache::default();
        tracing::debug!("Entity cache cleared");
    }

    async fn ensure_current(&self, operation: &'static str, generation: u64) -> MetaverseResult<()> {
        if self.context.is_current(generation).await {
            Ok(())
        } else {
            tracing::info!(operation = operation, "Discarding result from a previous session");
            Err(MetaverseError::SessionChanged(operation))
        }
    }

    fn report<T>(&self, operation: &'static str, outcome: MetaverseResult<T>) -> MetaverseResult<T> {
        if let Err(e) = &outcome {
            tracing::warn!(operation = operation, error = %e, "Operation failed");
            self.notifier.publish(Notice::OperationFailed {
                operation,
                message: e.to_string(),
            });
        }
        outcome
    }
}
