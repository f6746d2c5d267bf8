pub mod avatar;
pub mod delegation;
pub mod session;
pub mod ticket;
pub mod vr_world;

pub use avatar::{Avatar, AvatarDraft};
pub use delegation::{DelegatedCredential, Delegation};
pub use session::{SessionPhase, SessionSnapshot, SessionState};
pub use ticket::{Ticket, TicketDraft};
pub use vr_world::{VrWorld, WorldDraft};
