//! Domain definitions.

pub mod booking;
pub mod painter;
pub mod request;
pub mod slot;
pub mod user;

pub use self::{
    booking::Booking, painter::Painter, request::Request, slot::Slot,
};
