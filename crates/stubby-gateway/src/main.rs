mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stubby_core::{LinkStore, Registry};
use stubby_gateway::telemetry::init_tracing;
use stubby_gateway::{App, AppState};
use stubby_generator::{Generator, RandomGenerator, SeqGenerator};
use stubby_registry::{RegistryService, RegistrySettings};
use stubby_storage::{InMemoryStore, MySqlStore};
use tracing::{info, warn};

use crate::cli::{GeneratorArg, StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        generator = %config.generator,
        "starting gateway server"
    );

    let registry = match config.storage {
        StorageBackendArg::InMemory => with_generator(InMemoryStore::new(), &config),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlStore::connect(mysql_dsn)
                .await
                .context("failed to connect to mysql")?;
            store
                .ensure_schema()
                .await
                .context("failed to create links table")?;
            with_generator(store, &config)
        }
    };

    let app = App::router(AppState::new(registry, config.public_base_url.clone()));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn with_generator<S: LinkStore>(store: S, config: &CLI) -> Arc<dyn Registry> {
    let settings = RegistrySettings::builder()
        .max_attempts(config.max_attempts)
        .build();

    match config.generator {
        GeneratorArg::Random => build_registry(
            store,
            RandomGenerator::builder().length(config.code_length).build(),
            settings,
        ),
        GeneratorArg::Sequential => build_registry(
            store,
            SeqGenerator::with_prefix(config.sequence_prefix.clone()),
            settings,
        ),
    }
}

fn build_registry<S: LinkStore, G: Generator>(
    store: S,
    generator: G,
    settings: RegistrySettings,
) -> Arc<dyn Registry> {
    Arc::new(RegistryService::new(store, generator).with_settings(settings))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
