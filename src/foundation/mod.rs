//! Timeline primitives, error taxonomy and small numeric helpers shared by every stage.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
