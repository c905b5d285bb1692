//! [`Booking`] definitions.

#[cfg(doc)]
use common::{DateTime, Period};
use common::{unit, DateTimeOf, PeriodOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{painter, request};
#[cfg(doc)]
use crate::domain::{Painter, Request};

/// Assignment of a [`Painter`] to a matched [`Request`].
#[derive(Clone, Copy, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the [`Request`] this [`Booking`] fulfills.
    pub request_id: request::Id,

    /// ID of the assigned [`Painter`].
    pub painter_id: painter::Id,

    /// [`Period`] of time the [`Painter`] is booked for.
    pub window: Window,

    /// [`request::Status`] of this [`Booking`].
    pub status: request::Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Booking`].
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

/// [`Period`] of time a [`Booking`] reserves.
pub type Window = PeriodOf<(Booking, unit::Window)>;

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;
