//! [`Query`] collection related to a single [`Painter`].

use common::operations::By;

use crate::domain::{painter, user, Painter};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Painter`] by its [`painter::Id`].
pub type ById = DatabaseQuery<By<Option<Painter>, painter::Id>>;

/// Queries a [`Painter`] by the [`user::Id`] it's registered under.
pub type OfUser = DatabaseQuery<By<Option<Painter>, user::Id>>;
