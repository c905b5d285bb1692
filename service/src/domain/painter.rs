//! [`Painter`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

use crate::domain::user;

/// Painter providing services on the platform.
#[derive(Clone, Debug)]
pub struct Painter {
    /// ID of this [`Painter`].
    pub id: Id,

    /// ID of the user this [`Painter`] works as.
    pub user_id: user::Id,

    /// [`Name`] of this [`Painter`] displayed to customers.
    pub name: Name,

    /// [`Rating`] of this [`Painter`].
    pub rating: Rating,

    /// Number of [`Grade`]s the [`Rating`] of this [`Painter`] is based on.
    pub total_ratings: TotalRatings,

    /// Professional [`Experience`] of this [`Painter`], if described.
    pub experience: Option<Experience>,

    /// [`Specialty`]s of this [`Painter`].
    pub specialties: Vec<Specialty>,

    /// Hourly rate this [`Painter`] charges, if declared.
    pub hourly_rate: Option<Money>,

    /// Indicator whether this [`Painter`] accepts new work.
    pub is_active: bool,

    /// [`DateTime`] when this [`Painter`] was created.
    pub created_at: CreationDateTime,
}

impl Painter {
    /// Returns the matching [`Score`] of this [`Painter`].
    ///
    /// The better the [`Rating`] and the more [`Grade`]s it's based on, the
    /// higher the [`Score`]. A painter without any [`Grade`]s yet still
    /// receives the base [`Score`].
    #[must_use]
    pub fn score(&self) -> Score {
        let rating = f64::from(self.rating) * 20.0;
        let track_record = (f64::from(self.total_ratings) * 2.0).min(40.0);
        Score(40.0 + rating + track_record)
    }

    /// Records the given [`Grade`], moving the [`Rating`] of this [`Painter`]
    /// along its running average.
    pub fn rate(&mut self, grade: Grade) {
        let sum = f64::from(self.rating) * f64::from(self.total_ratings)
            + f64::from(u8::from(grade));
        self.total_ratings += 1;
        self.rating = Rating::new(sum / f64::from(self.total_ratings))
            .unwrap_or(Rating::MAX);
    }
}

/// ID of a [`Painter`].
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

    /// Derives the [`Id`] of the [`Painter`] working as the given user.
    ///
    /// Derivation is deterministic, so repeated registrations of the same
    /// user always address the same [`Painter`].
    #[must_use]
    pub fn derived_from(user_id: user::Id) -> Self {
        use std::hash::Hash as _;

        let mut hasher = xxh3::Xxh3Builder::new().build();
        Uuid::from(user_id).hash(&mut hasher);
        Self(Uuid::from_u128(hasher.digest128()))
    }
}

/// Name of a [`Painter`] displayed to customers.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Specialty a [`Painter`] advertises (like `interior` or `exterior`).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Specialty(String);

impl Specialty {
    /// Creates a new [`Specialty`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `specialty` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(specialty: impl Into<String>) -> Self {
        Self(specialty.into())
    }

    /// Creates a new [`Specialty`] if the given `specialty` is valid.
    #[must_use]
    pub fn new(specialty: impl Into<String>) -> Option<Self> {
        let specialty = specialty.into();
        Self::check(&specialty).then_some(Self(specialty))
    }

    /// Checks whether the given `specialty` is a valid [`Specialty`].
    fn check(specialty: impl AsRef<str>) -> bool {
        let specialty = specialty.as_ref();
        specialty.trim() == specialty
            && !specialty.is_empty()
            && specialty.len() <= 512
    }
}

impl FromStr for Specialty {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Specialty`")
    }
}

/// Average [`Rating`] of a [`Painter`], on a scale from 0 to 5.
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rating(f64);

impl Rating {
    /// Maximum possible [`Rating`].
    pub const MAX: Self = Self(5.0);

    /// [`Rating`] of a [`Painter`] not graded yet.
    pub const NONE: Self = Self(0.0);

    /// Creates a new [`Rating`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `rating` is on the scale.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(rating: f64) -> Self {
        Self(rating)
    }

    /// Creates a new [`Rating`] if the given `rating` is valid.
    #[must_use]
    pub fn new(rating: f64) -> Option<Self> {
        Self::check(rating).then_some(Self(rating))
    }

    /// Checks whether the given `rating` is a valid [`Rating`].
    fn check(rating: f64) -> bool {
        (0.0..=5.0).contains(&rating)
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().ok().and_then(Self::new).ok_or("invalid `Rating`")
    }
}

/// Single customer [`Grade`] given to a [`Painter`], on a scale from 1 to 5.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, PartialEq)]
pub struct Grade(u8);

impl Grade {
    /// Creates a new [`Grade`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `grade` is on the scale.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(grade: u8) -> Self {
        Self(grade)
    }

    /// Creates a new [`Grade`] if the given `grade` is valid.
    #[must_use]
    pub fn new(grade: u8) -> Option<Self> {
        Self::check(grade).then_some(Self(grade))
    }

    /// Checks whether the given `grade` is a valid [`Grade`].
    fn check(grade: u8) -> bool {
        (1..=5).contains(&grade)
    }
}

impl FromStr for Grade {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().ok().and_then(Self::new).ok_or("invalid `Grade`")
    }
}

/// Matching [`Score`] of a [`Painter`].
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd)]
pub struct Score(f64);

/// Description of a [`Painter`]'s professional experience.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Experience(String);

impl Experience {
    /// Creates a new [`Experience`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `experience` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(experience: impl Into<String>) -> Self {
        Self(experience.into())
    }

    /// Creates a new [`Experience`] if the given `experience` is valid.
    #[must_use]
    pub fn new(experience: impl Into<String>) -> Option<Self> {
        let experience = experience.into();
        Self::check(&experience).then_some(Self(experience))
    }

    /// Checks whether the given `experience` is a valid [`Experience`].
    fn check(experience: impl AsRef<str>) -> bool {
        let experience = experience.as_ref();
        experience.trim() == experience
            && !experience.is_empty()
            && experience.len() <= 512
    }
}

impl FromStr for Experience {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Experience`")
    }
}

/// Number of [`Grade`]s a [`Painter`] has received.
pub type TotalRatings = u32;

/// [`DateTime`] when a [`Painter`] was created.
pub type CreationDateTime = DateTimeOf<(Painter, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Grade, Painter, Rating};

    fn painter(rating: f64, total_ratings: u32) -> Painter {
        Painter {
            id: super::Id::new(),
            user_id: crate::domain::user::Id::new(),
            name: "Pat".parse().unwrap(),
            rating: Rating::new(rating).unwrap(),
            total_ratings,
            experience: None,
            specialties: vec![],
            hourly_rate: None,
            is_active: true,
            created_at: common::DateTime::now().coerce(),
        }
    }

    #[test]
    fn score_rewards_rating() {
        assert!(painter(4.9, 10).score() > painter(4.0, 10).score());
        assert_eq!(f64::from(painter(5.0, 0).score()), 140.0);
        assert_eq!(f64::from(painter(4.0, 10).score()), 140.0);
    }

    #[test]
    fn score_caps_track_record() {
        assert_eq!(
            painter(3.0, 20).score(),
            painter(3.0, 1000).score(),
        );
        assert_eq!(f64::from(painter(3.0, 20).score()), 140.0);
    }

    #[test]
    fn score_grants_base_to_ungraded() {
        assert_eq!(f64::from(painter(0.0, 0).score()), 40.0);
    }

    #[test]
    fn rate_moves_running_average() {
        let mut p = painter(0.0, 0);
        p.rate(Grade::new(4).unwrap());
        assert_eq!(p.rating, Rating::new(4.0).unwrap());
        assert_eq!(p.total_ratings, 1);

        p.rate(Grade::new(2).unwrap());
        assert_eq!(p.rating, Rating::new(3.0).unwrap());
        assert_eq!(p.total_ratings, 2);

        let mut maxed = painter(5.0, 99);
        maxed.rate(Grade::new(5).unwrap());
        assert_eq!(maxed.rating, Rating::MAX);
    }

    #[test]
    fn newtypes_expose_raw_values() {
        let p = painter(4.5, 3);
        let name: &str = p.name.as_ref();
        assert_eq!(name, "Pat");
        assert_eq!(f64::from(p.rating), 4.5);
        assert_eq!(super::Id::from(uuid::Uuid::from(p.id)), p.id);
    }

    #[test]
    fn grade_requires_scale() {
        assert!(Grade::new(0).is_none());
        assert!(Grade::new(6).is_none());
        assert!(Grade::new(1).is_some());
        assert!(Grade::new(5).is_some());

        assert!(Rating::new(-0.1).is_none());
        assert!(Rating::new(5.1).is_none());
        assert!(Rating::new(f64::NAN).is_none());
    }
}
