//! [`Painter`]-related read definitions.

use crate::domain::{painter, Painter};

/// Selector of [`Painter`]s accepting new work.
#[derive(Clone, Copy, Debug, Default)]
pub struct Active;

/// Compact description of a [`Painter`] exposed to customers.
#[derive(Clone, Debug)]
pub struct Summary {
    /// ID of the [`Painter`].
    pub id: painter::Id,

    /// [`painter::Name`] of the [`Painter`].
    pub name: painter::Name,

    /// [`painter::Rating`] of the [`Painter`].
    pub rating: painter::Rating,
}

impl From<Painter> for Summary {
    fn from(painter: Painter) -> Self {
        Self {
            id: painter.id,
            name: painter.name,
            rating: painter.rating,
        }
    }
}
