use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assist_api::chat::ollama::OllamaClient;
use assist_api::chat::ChatHub;
use assist_api::config::Config;
use assist_api::llm_client::embeddings::EMBEDDING_DIMENSIONS;
use assist_api::llm_client::{self, LlmClient, OpenAiEmbedder};
use assist_api::market::intent::MarkerParser;
use assist_api::market::{MarketDataClient, MarketDesk};
use assist_api::recruit::mailer::Mailer;
use assist_api::recruit::vector_store::QdrantStore;
use assist_api::recruit::workspace::Workspace;
use assist_api::recruit::RecruitDesk;
use assist_api::routes::build_router;
use assist_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting assist-api v{}", env!("CARGO_PKG_VERSION"));

    // Working directories
    config
        .dirs
        .ensure()
        .context("failed to create working directories")?;
    info!(
        "Working directories: cvs={} chunks={}",
        config.dirs.working.display(),
        config.dirs.chunks.display()
    );

    // Hosted model clients
    let llm = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
    )?);
    let embedder = Arc::new(OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Pipeline A: market-query assistant
    let market = MarketDesk {
        llm: llm.clone(),
        data: MarketDataClient::new(
            config.alpha_vantage_api_key.clone(),
            config.alpha_vantage_base_url.clone(),
        )?,
        parser: Arc::new(MarkerParser),
    };

    // Pipeline B: recruiting assistant
    if config.smtp.is_none() {
        info!("SMTP not configured; email sending will report failure");
    }
    let store = QdrantStore::connect(
        &config.qdrant_url,
        &config.qdrant_collection,
        EMBEDDING_DIMENSIONS,
    )
    .context("failed to build the Qdrant client")?;
    info!(
        "Vector store: {} (collection {})",
        config.qdrant_url, config.qdrant_collection
    );
    let recruit = RecruitDesk {
        workspace: Workspace::new(config.dirs.clone()),
        chunking: config.chunking,
        llm,
        embedder,
        store: Arc::new(store),
        mailer: Mailer::new(config.smtp.clone()),
    };

    // Pipeline C: chat front-end
    let chat = ChatHub::new(Arc::new(OllamaClient::new(&config.ollama_url)?));
    info!("Chat runtime at {}", config.ollama_url);

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        market: Arc::new(market),
        recruit: Arc::new(recruit),
        chat: Arc::new(chat),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
