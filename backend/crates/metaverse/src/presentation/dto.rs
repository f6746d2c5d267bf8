//! Wire DTOs
//!
//! camelCase JSON shared by the replica router and the HTTP adapters.
//! Timestamps travel as unsigned 64-bit epoch milliseconds.

use kernel::id::{AvatarId, TicketId, WorldId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    avatar::{Avatar, AvatarDraft},
    delegation::{DelegatedCredential, Delegation},
    ticket::{Ticket, TicketDraft},
    vr_world::{VrWorld, WorldDraft},
};
use crate::domain::value_object::{EventDate, HexColor, NonBlank, Principal, TicketType};
use crate::error::{MetaverseError, MetaverseResult};
use crate::infra::memory_actor::{ActorStats, UserProfile};

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvatarDto {
    pub id: String,
    pub name: String,
    pub color: String,
    pub accessory: String,
    pub owner: String,
}

impl From<&Avatar> for AvatarDto {
    fn from(avatar: &Avatar) -> Self {
        Self {
            id: avatar.id.to_string(),
            name: avatar.name.to_string(),
            color: avatar.color.as_str().to_string(),
            accessory: avatar.accessory.code().to_string(),
            owner: avatar.owner.to_string(),
        }
    }
}

impl TryFrom<AvatarDto> for Avatar {
    type Error = MetaverseError;

    fn try_from(dto: AvatarDto) -> MetaverseResult<Self> {
        Ok(Avatar {
            id: AvatarId::from_string(dto.id),
            name: NonBlank::parse("name", &dto.name)?,
            color: HexColor::parse(&dto.color)?,
            accessory: dto.accessory.parse()?,
            owner: Principal::parse(&dto.owner)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: String,
    pub event_name: String,
    pub event_date: u64,
    pub ticket_type: String,
    pub owner: String,
    pub is_used: bool,
}

impl From<&Ticket> for TicketDto {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            event_name: ticket.event_name.to_string(),
            event_date: ticket.event_date.as_millis(),
            ticket_type: ticket.ticket_type.as_str().to_string(),
            owner: ticket.owner.to_string(),
            is_used: ticket.is_used,
        }
    }
}

impl TryFrom<TicketDto> for Ticket {
    type Error = MetaverseError;

    fn try_from(dto: TicketDto) -> MetaverseResult<Self> {
        Ok(Ticket {
            id: TicketId::from_string(dto.id),
            event_name: NonBlank::parse("event name", &dto.event_name)?,
            event_date: EventDate::new(dto.event_date)?,
            ticket_type: TicketType::parse(&dto.ticket_type)?,
            owner: Principal::parse(&dto.owner)?,
            is_used: dto.is_used,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VrWorldDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator: String,
    pub created_at: u64,
    pub is_active: bool,
    pub participants: Vec<String>,
}

impl From<&VrWorld> for VrWorldDto {
    fn from(world: &VrWorld) -> Self {
        Self {
            id: world.id.to_string(),
            name: world.name.to_string(),
            description: world.description.to_string(),
            creator: world.creator.to_string(),
            created_at: world.created_at_ms,
            is_active: world.is_active,
            participants: world.participants().iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl TryFrom<VrWorldDto> for VrWorld {
    type Error = MetaverseError;

    fn try_from(dto: VrWorldDto) -> MetaverseResult<Self> {
        let participants = dto
            .participants
            .iter()
            .map(|p| Principal::parse(p))
            .collect::<MetaverseResult<Vec<_>>>()?;

        Ok(VrWorld::restore(
            WorldId::from_string(dto.id),
            NonBlank::parse("world name", &dto.name)?,
            NonBlank::parse("world description", &dto.description)?,
            Principal::parse(&dto.creator)?,
            dto.created_at,
            dto.is_active,
            participants,
        ))
    }
}

// ============================================================================
// Requests / Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvatarRequest {
    pub name: String,
    pub color: String,
    pub accessory: String,
}

impl From<&AvatarDraft> for CreateAvatarRequest {
    fn from(draft: &AvatarDraft) -> Self {
        Self {
            name: draft.name.to_string(),
            color: draft.color.as_str().to_string(),
            accessory: draft.accessory.code().to_string(),
        }
    }
}

impl TryFrom<CreateAvatarRequest> for AvatarDraft {
    type Error = MetaverseError;

    fn try_from(req: CreateAvatarRequest) -> MetaverseResult<Self> {
        AvatarDraft::new(&req.name, &req.color, &req.accessory)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintTicketRequest {
    pub event_name: String,
    pub event_date: u64,
    pub ticket_type: String,
}

impl From<&TicketDraft> for MintTicketRequest {
    fn from(draft: &TicketDraft) -> Self {
        Self {
            event_name: draft.event_name.to_string(),
            event_date: draft.event_date.as_millis(),
            ticket_type: draft.ticket_type.as_str().to_string(),
        }
    }
}

impl TryFrom<MintTicketRequest> for TicketDraft {
    type Error = MetaverseError;

    fn try_from(req: MintTicketRequest) -> MetaverseResult<Self> {
        TicketDraft::new(&req.event_name, req.event_date, &req.ticket_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVrWorldRequest {
    pub name: String,
    pub description: String,
}

impl From<&WorldDraft> for CreateVrWorldRequest {
    fn from(draft: &WorldDraft) -> Self {
        Self {
            name: draft.name.to_string(),
            description: draft.description.to_string(),
        }
    }
}

impl TryFrom<CreateVrWorldRequest> for WorldDraft {
    type Error = MetaverseError;

    fn try_from(req: CreateVrWorldRequest) -> MetaverseResult<Self> {
        WorldDraft::new(&req.name, &req.description)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinVrWorldRequest {
    pub world_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinVrWorldResponse {
    pub joined: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhoamiResponse {
    pub principal: String,
}

/// Body of `POST /identity/authorize`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_to_live_ms: Option<u64>,
    /// Principal to approve as; a fresh one is generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    /// Simulates the user closing the authorization window
    #[serde(default)]
    pub cancel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationDto {
    pub principal: String,
    pub credential: String,
    pub expires_at_ms: u64,
}

impl From<&Delegation> for DelegationDto {
    fn from(delegation: &Delegation) -> Self {
        Self {
            principal: delegation.principal.to_string(),
            credential: delegation.credential.expose().to_string(),
            expires_at_ms: delegation.expires_at_ms,
        }
    }
}

impl TryFrom<DelegationDto> for Delegation {
    type Error = MetaverseError;

    fn try_from(dto: DelegationDto) -> MetaverseResult<Self> {
        Ok(Delegation::new(
            Principal::parse(&dto.principal)?,
            DelegatedCredential::new(dto.credential),
            dto.expires_at_ms,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoutResponse {
    pub revoked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_avatars: usize,
    pub total_tickets: usize,
    pub total_vr_worlds: usize,
    pub active_sessions: usize,
}

impl StatsResponse {
    pub fn new(stats: ActorStats, active_sessions: usize) -> Self {
        Self {
            total_avatars: stats.avatars,
            total_tickets: stats.tickets,
            total_vr_worlds: stats.vr_worlds,
            active_sessions,
        }
    }
}

/// GET /api/users/{principal}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub principal: String,
    pub avatar: Option<AvatarDto>,
    pub tickets: Vec<TicketDto>,
    pub vr_worlds: Vec<VrWorldDto>,
}

impl From<&UserProfile> for UserProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            principal: profile.principal.to_string(),
            avatar: profile.avatar.as_ref().map(AvatarDto::from),
            tickets: profile.tickets.iter().map(TicketDto::from).collect(),
            vr_worlds: profile.vr_worlds.iter().map(VrWorldDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticket_wire_shape() {
        let ticket = TicketDraft::new("Conf2025", 1_735_689_600_000, "VIP")
            .unwrap()
            .into_ticket(
                TicketId::from_string("ticket_1"),
                Principal::parse("alice").unwrap(),
            );

        let value = serde_json::to_value(TicketDto::from(&ticket)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "ticket_1",
                "eventName": "Conf2025",
                "eventDate": 1_735_689_600_000u64,
                "ticketType": "VIP",
                "owner": "alice",
                "isUsed": false,
            })
        );
    }

    #[test]
    fn test_world_dto_restores_invariants() {
        let dto = VrWorldDto {
            id: "vr_world_1".to_string(),
            name: "Cyber Plaza".to_string(),
            description: "A futuristic cyberpunk cityscape".to_string(),
            creator: "user-1".to_string(),
            created_at: 1,
            is_active: true,
            participants: vec!["user-2".into(), "user-1".into(), "user-2".into()],
        };

        let world = VrWorld::try_from(dto).unwrap();
        let participants: Vec<_> = world.participants().iter().map(|p| p.as_str()).collect();
        assert_eq!(participants, vec!["user-1", "user-2"]);
    }

    #[test]
    fn test_invalid_dto_is_rejected() {
        let dto = AvatarDto {
            id: "avatar_1".to_string(),
            name: " ".to_string(),
            color: "#00ffff".to_string(),
            accessory: "none".to_string(),
            owner: "alice".to_string(),
        };
        assert!(Avatar::try_from(dto).is_err());
    }

    #[test]
    fn test_authorize_request_defaults() {
        let req: AuthorizeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.max_time_to_live_ms.is_none());
        assert!(req.principal.is_none());
        assert!(!req.cancel);

        let body = serde_json::to_value(AuthorizeRequest {
            max_time_to_live_ms: Some(1000),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({ "maxTimeToLiveMs": 1000, "cancel": false }));
    }
}
