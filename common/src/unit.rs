//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity's period of time.
#[derive(Clone, Copy, Debug)]
pub struct Window;
