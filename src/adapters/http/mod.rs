//! HTTP adapters - REST API implementations.

pub mod deck;

pub use deck::{cors_layer, deck_router, DeckAppState};
