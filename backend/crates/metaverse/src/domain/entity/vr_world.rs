//! VR World Entity
//!
//! A named shared space. The creator is always the first participant and
//! the participant list never holds duplicates.

use kernel::id::WorldId;

use crate::domain::value_object::{NonBlank, Principal};
use crate::error::MetaverseResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrWorld {
    pub id: WorldId,
    pub name: NonBlank,
    pub description: NonBlank,
    pub creator: Principal,
    /// Creation time (Unix timestamp ms)
    pub created_at_ms: u64,
    pub is_active: bool,
    participants: Vec<Principal>,
}

impl VrWorld {
    /// Create a new active world with the creator as sole participant
    pub fn new(id: WorldId, draft: WorldDraft, creator: Principal, created_at_ms: u64) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            participants: vec![creator.clone()],
            creator,
            created_at_ms,
            is_active: true,
        }
    }

    /// Rebuild from stored parts, restoring the participant invariants
    pub fn restore(
        id: WorldId,
        name: NonBlank,
        description: NonBlank,
        creator: Principal,
        created_at_ms: u64,
        is_active: bool,
        participants: Vec<Principal>,
    ) -> Self {
        let mut ordered = vec![creator.clone()];
        for participant in participants {
            if !ordered.contains(&participant) {
                ordered.push(participant);
            }
        }

        Self {
            id,
            name,
            description,
            creator,
            created_at_ms,
            is_active,
            participants: ordered,
        }
    }

    pub fn participants(&self) -> &[Principal] {
        &self.participants
    }

    pub fn has_participant(&self, principal: &Principal) -> bool {
        self.participants.contains(principal)
    }

    /// Add a participant; returns false if already present
    pub fn add_participant(&mut self, principal: &Principal) -> bool {
        if self.has_participant(principal) {
            return false;
        }
        self.participants.push(principal.clone());
        true
    }
}

/// Validated input for world creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldDraft {
    pub name: NonBlank,
    pub description: NonBlank,
}

impl WorldDraft {
    pub fn new(name: &str, description: &str) -> MetaverseResult<Self> {
        Ok(Self {
            name: NonBlank::parse("world name", name)?,
            description: NonBlank::parse("world description", description)?,
        })
    }
}
