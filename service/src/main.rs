use folio::{ChromeOptions, ChromeTypesetter, PipelineBuilder, PrintOptions};
use folio_service::{build_router, config::Config, state::AppState, state::load_document};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting folio service...");

    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let print = PrintOptions::default();
    let document = load_document(&config.generation, &print)?;

    let mut chrome = ChromeOptions::default().with_sandbox(config.chrome.sandbox);
    if let Some(path) = &config.chrome.executable {
        chrome = chrome.with_executable(path);
    }
    let typesetter = Arc::new(ChromeTypesetter::new(chrome));

    let pipeline = PipelineBuilder::new()
        .with_typesetter(typesetter.clone())
        .with_print_options(print)
        .with_timeout(config.generation.timeout())
        .build()?;

    let app_state = AppState::new(
        pipeline,
        document,
        config.generation.max_concurrent_generations,
        config.generation.filename.as_str(),
    );
    let app = build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("folio service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /api/document.pdf");
    tracing::info!("  - GET /health");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    typesetter.shutdown().await;
    tracing::info!("Browser closed");

    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,folio=debug,folio_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
