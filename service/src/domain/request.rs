//! [`Request`] definitions.

#[cfg(doc)]
use common::{DateTime, Period};
use common::{define_kind, unit, DateTimeOf, PeriodOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::Painter;

/// Customer's request to be matched with an available [`Painter`].
#[derive(Clone, Debug)]
pub struct Request {
    /// ID of this [`Request`].
    pub id: Id,

    /// ID of the user who placed this [`Request`].
    pub user_id: user::Id,

    /// [`Period`] of time the work is requested for.
    pub window: Window,

    /// [`Address`] where the requested work takes place.
    pub address: Address,

    /// [`Description`] of the requested work, if provided.
    pub description: Option<Description>,

    /// Estimated amount of hours the work takes, if provided.
    pub estimated_hours: Option<EstimatedHours>,

    /// [`Status`] of this [`Request`].
    pub status: Status,

    /// [`DateTime`] when this [`Request`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Request`].
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

/// Address where a [`Request`]ed work takes place.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address
            && !address.is_empty()
            && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Description of a [`Request`]ed work.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 512
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Estimated amount of whole hours a [`Request`]ed work takes.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct EstimatedHours(i16);

impl EstimatedHours {
    /// Creates a new [`EstimatedHours`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `hours` amount is positive.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(hours: i16) -> Self {
        Self(hours)
    }

    /// Creates a new [`EstimatedHours`] if the given `hours` amount is valid.
    #[must_use]
    pub fn new(hours: i16) -> Option<Self> {
        Self::check(hours).then_some(Self(hours))
    }

    /// Checks whether the given `hours` amount is a valid [`EstimatedHours`].
    fn check(hours: i16) -> bool {
        hours >= 1
    }
}

impl FromStr for EstimatedHours {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `EstimatedHours`")
    }
}

define_kind! {
    #[doc = "Status of a [`Request`] lifecycle."]
    enum Status {
        #[doc = "Request is placed and waits to be matched."]
        Pending = 1,

        #[doc = "Request is matched with a painter and confirmed."]
        Confirmed = 2,

        #[doc = "Requested work is being performed."]
        InProgress = 3,

        #[doc = "Requested work is completed."]
        Completed = 4,

        #[doc = "Request is cancelled."]
        Cancelled = 5,
    }
}

/// [`Period`] of time a [`Request`]ed work is wanted within.
pub type Window = PeriodOf<(Request, unit::Window)>;

/// [`DateTime`] when a [`Request`] was created.
pub type CreationDateTime = DateTimeOf<(Request, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn status_keeps_wire_names() {
        assert_eq!(Status::Pending.to_string(), "PENDING");
        assert_eq!(Status::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!("CONFIRMED".parse(), Ok(Status::Confirmed));
        assert_eq!("CANCELLED".parse(), Ok(Status::Cancelled));
        assert!("confirmed".parse::<Status>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn status_is_serializable() {
        fn assert_serde<T>()
        where
            T: serde::de::DeserializeOwned + serde::Serialize,
        {
        }

        assert_serde::<Status>();
    }
}
