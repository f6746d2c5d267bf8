//! TicketType Value Object
//!
//! Free text kept exactly as entered (after trimming). The ticket minter
//! offers a few well-known codes but any non-blank label is accepted.

use derive_more::Display;

use crate::domain::value_object::non_blank::NonBlank;
use crate::error::MetaverseResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct TicketType(NonBlank);

impl TicketType {
    pub const WELL_KNOWN: [&'static str; 4] = ["general", "vip", "premium", "backstage"];

    pub fn parse(raw: &str) -> MetaverseResult<Self> {
        NonBlank::parse("ticket type", raw).map(Self)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN
            .iter()
            .any(|code| code.eq_ignore_ascii_case(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_text() {
        let ticket_type = TicketType::parse("VIP").unwrap();
        assert_eq!(ticket_type.as_str(), "VIP");
        assert!(ticket_type.is_well_known());
    }

    #[test]
    fn test_custom_label() {
        let ticket_type = TicketType::parse("Early Bird").unwrap();
        assert!(!ticket_type.is_well_known());
    }

    #[test]
    fn test_blank_rejected() {
        assert!(TicketType::parse("  ").is_err());
    }
}
