//! Deckwright - presentation generation from a single free-text request.
//!
//! A request is planned into an ordered list of slide topics, each topic is
//! expanded into text or table content by a language model, and the results
//! are laid out onto a PresentationML template.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
