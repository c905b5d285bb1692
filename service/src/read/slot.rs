//! [`Slot`]-related read definitions.

use common::{DateTime, Period};

use crate::domain::{painter, Painter, Slot};

/// Unbooked [`Slot`] able to serve a requested period, together with the
/// [`Painter`] owning it.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// [`Painter`] owning the [`Slot`].
    pub painter: Painter,

    /// [`Slot`] able to serve the requested period.
    pub slot: Slot,
}

/// Selector of unbooked [`Slot`]s containing the given [`Period`] entirely.
#[derive(Clone, Copy, Debug)]
pub struct Containing(pub Period);

/// Selector of unbooked [`Slot`]s starting within the given bounds, both
/// inclusive.
#[derive(Clone, Copy, Debug)]
pub struct StartingWithin {
    /// Earliest [`DateTime`] a [`Slot`] may start at.
    pub from: DateTime,

    /// Latest [`DateTime`] a [`Slot`] may start at.
    pub until: DateTime,
}

/// Selector of [`Slot`]s of a [`Painter`] intersecting the given [`Period`].
#[derive(Clone, Copy, Debug)]
pub struct Overlapping {
    /// ID of the [`Painter`] owning the [`Slot`]s.
    pub painter_id: painter::Id,

    /// [`Period`] to probe for intersection.
    pub window: Period,
}

/// Selector of not-yet-started [`Slot`]s of a [`Painter`].
#[derive(Clone, Copy, Debug)]
pub struct UpcomingOf(pub painter::Id);

/// Selector of unbooked [`Slot`]s fully elapsed by the given [`DateTime`].
#[derive(Clone, Copy, Debug)]
pub struct ExpiredBy(pub DateTime);
