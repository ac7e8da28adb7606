//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod deck;

pub use deck::{
    BuildDeckCommand, BuildDeckError, BuildDeckHandler, BuildOutcome, DispatchError,
    PlanOutlineCommand, PlanOutlineError, PlanOutlineHandler, SlideContentDispatcher,
};
