pub mod accessory;
pub mod event_date;
pub mod hex_color;
pub mod non_blank;
pub mod principal;
pub mod ticket_type;

pub use accessory::Accessory;
pub use event_date::EventDate;
pub use hex_color::HexColor;
pub use non_blank::NonBlank;
pub use principal::Principal;
pub use ticket_type::TicketType;
