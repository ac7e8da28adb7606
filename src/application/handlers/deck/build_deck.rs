//! BuildDeckHandler - the generation and assembly pipeline.
//!
//! Items are processed strictly in plan order: slide N's content is requested
//! only after slide N-1 has been rendered. The pacer runs between consecutive
//! generation calls, never after the last one. Any generation failure aborts
//! the whole build; slides rendered before it are discarded.

use std::sync::Arc;
use thiserror::Error;

use super::generate_slide_content::{DispatchError, SlideContentDispatcher};
use super::plan_outline::{PlanOutlineCommand, PlanOutlineError, PlanOutlineHandler};
use crate::domain::deck::{AssembledDocument, LayoutEngine, LayoutStyle, PresentationPlan};
use crate::domain::foundation::ValidationError;
use crate::ports::{DeckWriteError, DeckWriter, GenerationError, Pacer};

/// Command to build a deck from an approved plan.
#[derive(Debug, Clone)]
pub struct BuildDeckCommand {
    pub plan: PresentationPlan,
    pub trace_id: String,
}

impl BuildDeckCommand {
    pub fn new(plan: PresentationPlan) -> Self {
        Self {
            plan,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }
}

/// A serialized deck plus what happened while building it.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The output document.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Number of slides in the document.
    pub slide_count: usize,
    /// 1-based plan positions skipped for an unrecognized slide type.
    pub skipped: Vec<usize>,
}

/// Pipeline failures.
#[derive(Debug, Error)]
pub enum BuildDeckError {
    #[error("planning failed: {0}")]
    Planning(#[from] PlanOutlineError),

    #[error("plan is invalid: {0}")]
    InvalidPlan(#[from] ValidationError),

    /// Content generation for one slide failed.
    #[error("failed to generate slide {index} (topic: '{topic}'): {source}")]
    SlideGeneration {
        /// 1-based plan position.
        index: usize,
        topic: String,
        #[source]
        source: GenerationError,
    },

    #[error("failed to write document: {0}")]
    Write(#[from] DeckWriteError),
}

/// Handler for the full pipeline.
///
/// # Dependencies
///
/// - `PlanOutlineHandler`: used by [`BuildDeckHandler::build_from_request`]
/// - `SlideContentDispatcher`: per-slide generation
/// - `DeckWriter`: template canvas and serialization
/// - `Pacer`: delay between generation calls
pub struct BuildDeckHandler {
    planner: PlanOutlineHandler,
    dispatcher: SlideContentDispatcher,
    writer: Arc<dyn DeckWriter>,
    pacer: Arc<dyn Pacer>,
    style: LayoutStyle,
}

impl BuildDeckHandler {
    pub fn new(
        planner: PlanOutlineHandler,
        dispatcher: SlideContentDispatcher,
        writer: Arc<dyn DeckWriter>,
        pacer: Arc<dyn Pacer>,
        style: LayoutStyle,
    ) -> Self {
        Self {
            planner,
            dispatcher,
            writer,
            pacer,
            style,
        }
    }

    /// Plans from a free-text request, then builds the planned deck.
    pub async fn build_from_request(
        &self,
        request: impl Into<String>,
    ) -> Result<BuildOutcome, BuildDeckError> {
        let plan_cmd = PlanOutlineCommand::new(request);
        let trace_id = plan_cmd.trace_id.clone();
        let plan = self.planner.handle(plan_cmd).await?;

        self.handle(BuildDeckCommand::new(plan).with_trace_id(trace_id)).await
    }

    /// Builds the deck for an approved plan.
    pub async fn handle(&self, cmd: BuildDeckCommand) -> Result<BuildOutcome, BuildDeckError> {
        let BuildDeckCommand { plan, trace_id } = cmd;
        plan.validate()?;

        let engine = LayoutEngine::new(self.writer.canvas(), self.style.clone());
        let mut document = AssembledDocument::new(engine.canvas(), self.writer.layout_index());
        let mut skipped = Vec::new();
        let mut calls_made = 0usize;

        tracing::info!(trace_id = %trace_id, items = plan.len(), "Building deck");

        for (offset, item) in plan.items().iter().enumerate() {
            let index = offset + 1;

            if !item.slide_type.is_supported() {
                tracing::warn!(
                    trace_id = %trace_id,
                    slide_index = index,
                    topic = %item.topic,
                    slide_type = %item.slide_type,
                    "Skipping slide with unrecognized type"
                );
                skipped.push(index);
                continue;
            }

            if calls_made > 0 {
                tracing::debug!(
                    trace_id = %trace_id,
                    delay_ms = self.pacer.interval().as_millis() as u64,
                    "Pacing before next generation call"
                );
                self.pacer.pause().await;
            }
            calls_made += 1;

            tracing::info!(
                trace_id = %trace_id,
                slide_index = index,
                topic = %item.topic,
                slide_type = %item.slide_type,
                "Generating slide content"
            );

            let content = match self.dispatcher.generate(item, &trace_id).await {
                Ok(content) => content,
                Err(DispatchError::UnsupportedSlideType(tag)) => {
                    tracing::warn!(trace_id = %trace_id, slide_index = index, slide_type = %tag, "Skipping unsupported slide type");
                    skipped.push(index);
                    continue;
                }
                Err(DispatchError::Generation(source)) => {
                    tracing::error!(
                        trace_id = %trace_id,
                        slide_index = index,
                        topic = %item.topic,
                        error = %source,
                        "Slide generation failed, aborting deck"
                    );
                    return Err(BuildDeckError::SlideGeneration {
                        index,
                        topic: item.topic.clone(),
                        source,
                    });
                }
            };

            document.push(engine.render(&content));
        }

        let bytes = self.writer.write(&document)?;

        tracing::info!(
            trace_id = %trace_id,
            slides = document.slide_count(),
            skipped = skipped.len(),
            bytes = bytes.len(),
            "Deck built"
        );

        Ok(BuildOutcome {
            bytes,
            content_type: self.writer.content_type(),
            slide_count: document.slide_count(),
            skipped,
        })
    }
}
