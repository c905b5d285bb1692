//! [`Command`] definition.

pub mod create_booking_request;
pub mod declare_slot;
pub mod delete_slot;
pub mod rate_painter;
pub mod register_painter;
pub mod release_slot;
pub mod reserve_slot;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_booking_request::CreateBookingRequest, declare_slot::DeclareSlot,
    delete_slot::DeleteSlot, rate_painter::RatePainter,
    register_painter::RegisterPainter, release_slot::ReleaseSlot,
    reserve_slot::ReserveSlot,
};
