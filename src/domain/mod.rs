//! Domain layer - pure presentation types and rules.

pub mod deck;
pub mod foundation;
