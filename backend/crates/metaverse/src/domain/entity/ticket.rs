//! Ticket Entity
//!
//! Append-only record of a minted event pass. `is_used` starts false and is
//! never changed by the client core.

use kernel::id::TicketId;

use crate::domain::value_object::{EventDate, NonBlank, Principal, TicketType};
use crate::error::MetaverseResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub event_name: NonBlank,
    pub event_date: EventDate,
    pub ticket_type: TicketType,
    pub owner: Principal,
    pub is_used: bool,
}

/// Validated input for ticket minting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub event_name: NonBlank,
    pub event_date: EventDate,
    pub ticket_type: TicketType,
}

impl TicketDraft {
    pub fn new(event_name: &str, event_date: u64, ticket_type: &str) -> MetaverseResult<Self> {
        Ok(Self {
            event_name: NonBlank::parse("event name", event_name)?,
            event_date: EventDate::new(event_date)?,
            ticket_type: TicketType::parse(ticket_type)?,
        })
    }

    pub fn into_ticket(self, id: TicketId, owner: Principal) -> Ticket {
        Ticket {
            id,
            event_name: self.event_name,
            event_date: self.event_date,
            ticket_type: self.ticket_type,
            owner,
            is_used: false,
        }
    }
}
