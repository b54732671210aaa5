use std::sync::Arc;

pub mod config;
pub mod error;
pub mod message;
pub mod providers;
pub mod store;
pub mod telemetry;
pub mod web;

use config::{ServerConfig, StorageConfig};
use error::ServerError;
use message::MessageService;
use providers::ProviderRegistry;
use store::{InMemoryMessageStore, JsonlMessageStore, MessageStore};
use web::WebState;

pub async fn open_store(storage: &StorageConfig) -> Result<Arc<dyn MessageStore>, ServerError> {
    Ok(match storage {
        StorageConfig::InMemory => Arc::new(InMemoryMessageStore::new()),
        StorageConfig::Jsonl(path) => Arc::new(JsonlMessageStore::open(path).await?),
    })
}

pub fn build_state(store: Arc<dyn MessageStore>, config: &ServerConfig) -> WebState {
    WebState {
        messages: MessageService::new(store),
        providers: Arc::new(ProviderRegistry::new(config.providers.clone(), config.provider_ttl)),
    }
}

pub async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_env();
    telemetry::init_logging(config.log_json)?;

    let store = open_store(&config.storage).await?;
    let router = web::build_router(build_state(store, &config), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind { addr: config.bind_addr, source })?;

    tracing::info!(addr = %config.bind_addr, static_dir = %config.static_dir.display(), "pipeline-trace server listening");
    if config.bind_addr.ip().is_unspecified() {
        match local_ip_address::local_ip() {
            Ok(ip) => tracing::info!("LAN URL: http://{}:{}", ip, config.bind_addr.port()),
            Err(e) => tracing::debug!(error = %e, "could not determine LAN address"),
        }
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
