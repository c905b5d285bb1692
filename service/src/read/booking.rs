//! [`Booking`]-related read definitions.

use crate::domain::{Booking, Request};

use super::painter;

/// [`Request`] of a user together with its [`Assignment`], if matched.
#[derive(Clone, Debug)]
pub struct View {
    /// [`Request`] placed by the user.
    pub request: Request,

    /// [`Assignment`] fulfilling the [`Request`], if it's matched already.
    pub assignment: Option<Assignment>,
}

/// [`Booking`] together with the [`painter::Summary`] of the assigned
/// painter.
#[derive(Clone, Debug)]
pub struct Assignment {
    /// [`Booking`] reserving the painter's time.
    pub booking: Booking,

    /// [`painter::Summary`] of the assigned painter.
    pub painter: painter::Summary,
}

/// [`Booking`] of a painter together with the [`Request`] it fulfills.
#[derive(Clone, Debug)]
pub struct Appointment {
    /// [`Booking`] reserving the painter's time.
    pub booking: Booking,

    /// [`Request`] the [`Booking`] fulfills.
    pub request: Request,
}
