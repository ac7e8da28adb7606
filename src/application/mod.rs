//! Application layer - Commands and Handlers.
//!
//! This layer sequences domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    BuildDeckCommand, BuildDeckError, BuildDeckHandler, BuildOutcome, DispatchError,
    PlanOutlineCommand, PlanOutlineError, PlanOutlineHandler, SlideContentDispatcher,
};
