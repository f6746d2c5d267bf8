//! Avatar Entity
//!
//! A user's single cosmetic profile record. At most one per principal;
//! re-creation overwrites it.

use kernel::id::AvatarId;

use crate::domain::value_object::{Accessory, HexColor, NonBlank, Principal};
use crate::error::MetaverseResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub id: AvatarId,
    pub name: NonBlank,
    pub color: HexColor,
    pub accessory: Accessory,
    pub owner: Principal,
}

/// Validated input for avatar creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarDraft {
    pub name: NonBlank,
    pub color: HexColor,
    pub accessory: Accessory,
}

impl AvatarDraft {
    pub fn new(name: &str, color: &str, accessory: &str) -> MetaverseResult<Self> {
        Ok(Self {
            name: NonBlank::parse("name", name)?,
            color: HexColor::parse(color)?,
            accessory: accessory.parse()?,
        })
    }

    pub fn into_avatar(self, id: AvatarId, owner: Principal) -> Avatar {
        Avatar {
            id,
            name: self.name,
            color: self.color,
            accessory: self.accessory,
            owner,
        }
    }
}
