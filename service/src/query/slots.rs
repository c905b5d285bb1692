//! [`Query`] collection related to the multiple [`Slot`]s.

use common::operations::By;

use crate::{domain::Slot, read};
#[cfg(doc)]
use crate::{domain::Painter, Query};

use super::DatabaseQuery;

/// Queries the not-yet-started [`Slot`]s of a [`Painter`], ordered by their
/// start ascending.
pub type Upcoming = DatabaseQuery<By<Vec<Slot>, read::slot::UpcomingOf>>;

/// Queries the unbooked [`Slot`]s able to serve a requested period, together
/// with the [`Painter`]s owning them.
pub type Available =
    DatabaseQuery<By<Vec<read::slot::Candidate>, read::slot::Containing>>;
