//! Common ID Types
//!
//! Type-safe wrappers for the opaque string identifiers the remote service
//! hands out (`ticket_7`, `vr_world_2`, ...).

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type TicketId = Id<markers::Ticket>;
///
/// let id = TicketId::from_string("ticket_1");
/// assert_eq!(id.as_str(), "ticket_1");
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4 text)
    pub fn new() -> Self {
        Self::from_string(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier issued elsewhere
    pub fn from_string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::from_string(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_string)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for Avatar IDs
    pub struct Avatar;

    /// Marker for Ticket IDs
    pub struct Ticket;

    /// Marker for VR world IDs
    pub struct VrWorld;
}

/// Type aliases for common IDs
pub type AvatarId = Id<markers::Avatar>;
pub type TicketId = Id<markers::Ticket>;
pub type WorldId = Id<markers::VrWorld>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = TicketId::new();
        let b = TicketId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_from_string() {
        let id: WorldId = "vr_world_3".into();
        assert_eq!(id.as_str(), "vr_world_3");
        assert_eq!(id.to_string(), "vr_world_3");
    }

    #[test]
    fn test_serde_transparent() {
        let id = AvatarId::from_string("avatar_1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""avatar_1""#);

        let back: AvatarId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
