mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod presenter;
mod routes;
mod state;
mod store;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionClient, LlmClient, TextGenerator};
use crate::presenter::clipboard::{Clipboard, ClipboardError, CommandClipboard};
use crate::presenter::export::LetterPageExporter;
use crate::presenter::markdown::HtmlRenderer;
use crate::presenter::ResultPresenter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DebouncedSaver, FileKvStore, FormStore, SAVE_DEBOUNCE};
use crate::wizard::FormSession;

#[tokio::main]
async fn main() -> Result<()> {
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

    info!("Starting Resume Wizard v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client. A missing key is not fatal: the form still works,
    // generation reports the configuration error.
    let completion = LlmClient::new(config.anthropic_api_key.clone(), config.llm_settings())
        .map(|llm| {
            info!("LLM client initialized (model: {})", llm.model());
            let model = llm.model().to_string();
            let generator: Arc<dyn TextGenerator> = Arc::new(llm);
            CompletionClient::new(generator, model)
        })
        .inspect_err(|e| warn!("Generation disabled: {e}"));

    // Initialize local form storage
    let store = FormStore::new(Arc::new(FileKvStore::new(&config.data_dir)));
    let saver = DebouncedSaver::spawn(store.clone(), SAVE_DEBOUNCE);
    info!("Form storage at {}", config.data_dir.display());

    let clipboard: Arc<dyn Clipboard> = match CommandClipboard::from_command_line(&config.clipboard_command) {
        Ok(clipboard) => Arc::new(clipboard),
        Err(e) => {
            warn!("Clipboard unavailable: {e}");
            Arc::new(NoClipboard)
        }
    };
    let presenter = ResultPresenter::new(
        Arc::new(HtmlRenderer),
        clipboard,
        Arc::new(LetterPageExporter::new(&config.export_dir)),
    );

    let session = Arc::new(FormSession::open(store, saver, completion, presenter).await);

    // Build app state
    let state = AppState {
        session: session.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.flush().await;
    info!("Pending form changes saved, shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

/// Used when no clipboard command is configured; every copy reports it.
struct NoClipboard;

#[async_trait::async_trait]
impl Clipboard for NoClipboard {
    async fn copy(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::NotConfigured)
    }
}
