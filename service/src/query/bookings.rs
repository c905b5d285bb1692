//! [`Query`] collection related to [`Booking`]s.

use common::operations::By;

use crate::{
    domain::{painter, user},
    read,
};
#[cfg(doc)]
use crate::{domain::Booking, Query};

use super::DatabaseQuery;

/// Queries the [`read::booking::View`]s of a user, newest first.
pub type OfUser = DatabaseQuery<By<Vec<read::booking::View>, user::Id>>;

/// Queries the [`read::booking::Appointment`]s of a painter, newest first.
pub type OfPainter =
    DatabaseQuery<By<Vec<read::booking::Appointment>, painter::Id>>;
