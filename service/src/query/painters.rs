//! [`Query`] collection related to the multiple [`Painter`]s.

use common::operations::By;

use crate::{domain::Painter, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Painter`]s accepting new work.
pub type Active = DatabaseQuery<By<Vec<Painter>, read::painter::Active>>;
