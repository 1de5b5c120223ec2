mod config;

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use creatorhub_api::{AppStateInner, router};
use creatorhub_assist::{Assistant, GeminiClient};
use creatorhub_realtime::{DeliverySimulator, Dispatcher, IncomingSimulator, SimulatorConfig};
use creatorhub_store::Store;

use crate::config::Config;

/// Upper bound on a single Gemini call.
const ASSIST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creatorhub=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Shared state
    let store = Arc::new(Store::seeded());
    let dispatcher = Dispatcher::new();
    let delivery = DeliverySimulator::new(
        store.clone(),
        dispatcher.clone(),
        config.delivery_delay,
        config.delivery_failure_rate,
        config.seed,
    );
    let assistant = match &config.gemini_api_key {
        Some(key) => Assistant::gemini(GeminiClient::new(key.clone(), ASSIST_TIMEOUT)?),
        None => {
            warn!("GEMINI_API_KEY is not set, AI features will return fallbacks");
            Assistant::unconfigured()
        }
    };

    let state = Arc::new(AppStateInner {
        store: store.clone(),
        dispatcher: dispatcher.clone(),
        delivery,
        assistant,
    });

    // Background incoming message simulator
    let simulator = config.realtime.then(|| {
        IncomingSimulator::new(
            store,
            dispatcher,
            SimulatorConfig {
                interval: config.sim_interval,
                typing_duration: config.typing_duration,
                seed: config.seed,
            },
        )
        .spawn()
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("CreatorHub server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(simulator) = simulator {
        simulator.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
