//! Read entities definitions.

pub mod booking;
pub mod matching;
pub mod painter;
pub mod slot;

pub use self::matching::Alternative;
