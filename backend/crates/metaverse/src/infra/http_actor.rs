//! HTTP Remote Actor
//!
//! Live `RemoteActor` speaking JSON to `{service}/api/<operation>`.

use kernel::id::WorldId;
use platform::transport::{JsonTransport, TransportError};
use serde::de::DeserializeOwned;

use crate::application::config::MetaverseConfig;
use crate::domain::entity::{
    avatar::{Avatar, AvatarDraft},
    ticket::{Ticket, TicketDraft},
    vr_world::{VrWorld, WorldDraft},
};
use crate::domain::port::{CallContext, RemoteActor};
use crate::domain::value_object::Principal;
use crate::error::{MetaverseError, MetaverseResult};
use crate::presentation::dto::{
    AvatarDto, CreateAvatarRequest, CreateVrWorldRequest, JoinVrWorldRequest,
    JoinVrWorldResponse, MintTicketRequest, TicketDto, VrWorldDto, WhoamiResponse,
};

#[derive(Debug, Clone)]
pub struct HttpActor {
    transport: JsonTransport,
}

impl HttpActor {
    pub fn new(transport: JsonTransport) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &MetaverseConfig) -> MetaverseResult<Self> {
        let transport = JsonTransport::new(&config.service_address, config.request_timeout)?;
        Ok(Self::new(transport))
    }

    async fn post<B, R>(&self, caller: &CallContext, operation: &str, body: &B) -> MetaverseResult<R>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let path = format!("api/{operation}");
        self.transport
            .post_json(&path, Some(caller.credential.expose()), body)
            .await
            .map_err(map_transport)
    }

    async fn get<R>(&self, caller: &CallContext, operation: &str) -> MetaverseResult<R>
    where
        R: DeserializeOwned,
    {
        let path = format!("api/{operation}");
        self.transport
            .get_json(&path, Some(caller.credential.expose()))
            .await
            .map_err(map_transport)
    }
}

/// 401 means the delegation is no longer accepted
fn map_transport(err: TransportError) -> MetaverseError {
    if err.is_unauthorized() {
        MetaverseError::Unauthenticated
    } else {
        MetaverseError::Transport(err)
    }
}

/// A response that parsed as JSON but violates entity invariants
fn malformed(err: MetaverseError) -> MetaverseError {
    MetaverseError::Transport(TransportError::Decode(err.to_string()))
}

fn decode_all<D, T>(items: Vec<D>) -> MetaverseResult<Vec<T>>
where
    T: TryFrom<D, Error = MetaverseError>,
{
    items
        .into_iter()
        .map(T::try_from)
        .collect::<MetaverseResult<Vec<_>>>()
        .map_err(malformed)
}

fn decode_opt<D, T>(item: Option<D>) -> MetaverseResult<Option<T>>
where
    T: TryFrom<D, Error = MetaverseError>,
{
    item.map(T::try_from).transpose().map_err(malformed)
}

impl RemoteActor for HttpActor {
    async fn create_avatar(
        &self,
        caller: &CallContext,
        draft: &AvatarDraft,
    ) -> MetaverseResult<Option<Avatar>> {
        let dto: Option<AvatarDto> = self
            .post(caller, "create_avatar", &CreateAvatarRequest::from(draft))
            .await?;
        decode_opt(dto)
    }

    async fn get_avatar(&self, caller: &CallContext) -> MetaverseResult<Option<Avatar>> {
        let dto: Option<AvatarDto> = self.get(caller, "get_avatar").await?;
        decode_opt(dto)
    }

    async fn mint_ticket(
        &self,
        caller: &CallContext,
        draft: &TicketDraft,
    ) -> MetaverseResult<Option<Ticket>> {
        let dto: Option<TicketDto> = self
            .post(caller, "mint_ticket", &MintTicketRequest::from(draft))
            .await?;
        decode_opt(dto)
    }

    async fn get_tickets(&self, caller: &CallContext) -> MetaverseResult<Vec<Ticket>> {
        let dtos: Vec<TicketDto> = self.get(caller, "get_tickets").await?;
        decode_all(dtos)
    }

    async fn create_vr_world(
        &self,
        caller: &CallContext,
        draft: &WorldDraft,
    ) -> MetaverseResult<Option<VrWorld>> {
        let dto: Option<VrWorldDto> = self
            .post(caller, "create_vr_world", &CreateVrWorldRequest::from(draft))
            .await?;
        decode_opt(dto)
    }

    async fn get_all_vr_worlds(&self, caller: &CallContext) -> MetaverseResult<Vec<VrWorld>> {
        let dtos: Vec<VrWorldDto> = self.get(caller, "get_all_vr_worlds").await?;
        decode_all(dtos)
    }

    async fn get_user_vr_worlds(&self, caller: &CallContext) -> MetaverseResult<Vec<VrWorld>> {
        let dtos: Vec<VrWorldDto> = self.get(caller, "get_user_vr_worlds").await?;
        decode_all(dtos)
    }

    async fn join_vr_world(&self, caller: &CallContext, world_id: &WorldId) -> MetaverseResult<bool> {
        let request = JoinVrWorldRequest {
            world_id: world_id.to_string(),
        };
        let response: JoinVrWorldResponse = self.post(caller, "join_vr_world", &request).await?;
        Ok(response.joined)
    }

    async fn whoami(&self, caller: &CallContext) -> MetaverseResult<Principal> {
        let response: WhoamiResponse = self.get(caller, "whoami").await?;
        Principal::parse(&response.principal).map_err(malformed)
    }
}
