//! Deckwright HTTP server.

use std::sync::Arc;

use deckwright::adapters::ai::{AnthropicConfig, AnthropicProvider, LlmContentGenerator};
use deckwright::adapters::http::{cors_layer, deck_router, DeckAppState};
use deckwright::adapters::pacing::FixedIntervalPacer;
use deckwright::adapters::pptx::{PptxDeckWriter, PptxTemplate};
use deckwright::application::{
    BuildDeckHandler, PlanOutlineHandler, SlideContentDispatcher,
};
use deckwright::config::{AppConfig, ValidationError};
use deckwright::domain::deck::LayoutStyle;
use deckwright::ports::{ContentGenerator, DeckWriter, Pacer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.server.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    config.validate()?;

    let template = match &config.deck.template_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading presentation template");
            PptxTemplate::from_path(path)?
        }
        None => {
            tracing::info!("Using built-in presentation template");
            PptxTemplate::builtin()
        }
    };
    let writer: Arc<dyn DeckWriter> = Arc::new(PptxDeckWriter::new(
        Arc::new(template),
        config.deck.layout_index,
    )?);

    let api_key = config
        .ai
        .anthropic_api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))?;
    let provider = AnthropicProvider::new(
        AnthropicConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?;
    let generator: Arc<dyn ContentGenerator> = Arc::new(
        LlmContentGenerator::new(Arc::new(provider))
            .with_temperature(config.ai.temperature)
            .with_max_tokens(config.ai.max_tokens),
    );
    let pacer: Arc<dyn Pacer> = Arc::new(FixedIntervalPacer::new(config.deck.pacing_interval()));

    let planner = Arc::new(PlanOutlineHandler::new(generator.clone()));
    let builder = Arc::new(BuildDeckHandler::new(
        PlanOutlineHandler::new(generator.clone()),
        SlideContentDispatcher::new(generator),
        writer,
        pacer,
        LayoutStyle::default().with_font(&config.deck.font_name),
    ));

    let state = DeckAppState::new(planner, builder, &config.deck.output_filename)?;
    let app = deck_router(state, cors_layer(&config.server.cors_origins_list()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, model = %config.ai.model, "Deckwright listening");

    axum::serve(listener, app).await?;
    Ok(())
}
