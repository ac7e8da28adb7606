//! Deck handlers - planning, per-slide dispatch and the build pipeline.

mod build_deck;
mod generate_slide_content;
mod plan_outline;
mod prompts;

pub use build_deck::{BuildDeckCommand, BuildDeckError, BuildDeckHandler, BuildOutcome};
pub use generate_slide_content::{DispatchError, SlideContentDispatcher};
pub use plan_outline::{PlanOutlineCommand, PlanOutlineError, PlanOutlineHandler};
pub use prompts::{PLANNER_INSTRUCTIONS, TABLE_SLIDE_INSTRUCTIONS, TEXT_SLIDE_INSTRUCTIONS};
