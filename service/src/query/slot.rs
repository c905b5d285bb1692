//! [`Query`] collection related to a single [`Slot`].

use common::operations::By;

use crate::domain::{slot, Slot};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Slot`] by its [`slot::Id`].
pub type ById = DatabaseQuery<By<Option<Slot>, slot::Id>>;
