//! [`Slot`] definitions.

#[cfg(doc)]
use common::{DateTime, Period};
use common::{unit, DateTimeOf, PeriodOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::painter;
#[cfg(doc)]
use crate::domain::Painter;

/// [`Period`] of time a [`Painter`] declared itself available to work.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    /// ID of this [`Slot`].
    pub id: Id,

    /// ID of the [`Painter`] this [`Slot`] belongs to.
    pub painter_id: painter::Id,

    /// [`Period`] of time this [`Slot`] spans.
    pub window: Window,

    /// Indicator whether this [`Slot`] is booked already.
    pub is_booked: bool,

    /// [`DateTime`] when this [`Slot`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Slot`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Selector of a [`Slot`] to reserve for a booking.
///
/// Reservation succeeds only if the [`Slot`] is not booked yet.
#[derive(Clone, Copy, Debug)]
pub struct Book(pub Id);

/// Selector of a [`Slot`] to free up a reservation of.
///
/// Freeing succeeds only if the [`Slot`] is booked.
#[derive(Clone, Copy, Debug)]
pub struct Free(pub Id);

/// Selector of a [`Slot`] by its ID and the owning [`Painter`].
#[derive(Clone, Copy, Debug)]
pub struct Owned {
    /// ID of the [`Slot`].
    pub id: Id,

    /// ID of the [`Painter`] owning the [`Slot`].
    pub painter_id: painter::Id,
}

/// [`Period`] of time a [`Slot`] spans.
pub type Window = PeriodOf<(Slot, unit::Window)>;

/// [`DateTime`] when a [`Slot`] was created.
pub type CreationDateTime = DateTimeOf<(Slot, unit::Creation)>;
