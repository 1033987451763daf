use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload};
use vigie_app::app::api::routes;
use vigie_app::config::ConfigHandler;
use vigie_core::config::{Settings, StorageBackend, load_config};
use vigie_db::db::{DbProvider, connection::create_pool, migrate::run_migrations};
use vigie_service::auth::{AccessControl, Seed, depot::AccessControlHandler};

async fn build_access_control(config: &Settings) -> anyhow::Result<AccessControl> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            anyhow::ensure!(
                !config.database.url.is_empty(),
                "database.url is required for the postgres storage backend"
            );

            run_migrations(&config.database.url).await?;
            tracing::info!("Database migrations applied.");

            let pool = create_pool(
                &config.database.url,
                u32::from(config.database.max_connections),
            )
            .await?;
            tracing::info!("Database connection pool created.");

            let provider: Arc<dyn DbProvider + Send + Sync> = Arc::new(pool);
            Ok(AccessControl::postgres(provider))
        }
        StorageBackend::Memory => {
            let Some(path) = config.storage.seed.as_deref() else {
                anyhow::bail!("storage.seed is required for the memory storage backend");
            };

            let (access, report) = Seed::read(path).await?.into_access_control().await?;
            tracing::info!(
                seed = path,
                principals = report.principals,
                nodes = report.nodes,
                grants = report.grants,
                "In-memory registry seeded; changes will not be persisted"
            );
            Ok(access)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter_layer).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true),
    );
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    tracing::info!("Starting vigie access control server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let access = build_access_control(&config).await?;

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: Arc::new(config),
        })
        .hoop(AccessControlHandler {
            access: Arc::new(access),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
