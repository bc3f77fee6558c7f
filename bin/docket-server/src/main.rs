//! Docket Server
//!
//! REST API over the docket platform:
//! - Docket record validation and storage
//! - User registration, login, logout
//!
//! Configuration comes from the environment; see `docket_common::config`.

use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

use docket_common::{init_tracing, DocketConfig, StorageBackend};
use docket_platform::api::create_router;
use docket_platform::repository::{
    ensure_indexes, DocketRepository, MemoryDocketRepository, MemoryUserRepository,
    MongoDocketRepository, MongoUserRepository, UserRepository,
};
use docket_platform::service::{
    Argon2Config, DocketService, PasswordPolicy, PasswordService, TokenConfig, TokenService,
    UserService,
};
use docket_platform::SchemaValidator;

async fn build_repositories(
    config: &DocketConfig,
) -> Result<(Arc<dyn DocketRepository>, Arc<dyn UserRepository>)> {
    match config.storage {
        StorageBackend::Mongo => {
            info!("Connecting to MongoDB: {}/{}", config.mongo_url, config.mongo_db);
            let client = mongodb::Client::with_uri_str(&config.mongo_url).await?;
            let db = client.database(&config.mongo_db);

            ensure_indexes(&db, &config.user_collection).await?;

            Ok((
                Arc::new(MongoDocketRepository::new(&db, &config.docket_collection)),
                Arc::new(MongoUserRepository::new(&db, &config.user_collection)),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok((
                Arc::new(MemoryDocketRepository::new()),
                Arc::new(MemoryUserRepository::new()),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DocketConfig::from_env()?;
    init_tracing(config.log_json);

    info!("Starting Docket Server");

    let (docket_repo, user_repo) = build_repositories(&config).await?;

    let validator = Arc::new(SchemaValidator::docket()?);
    let docket_service = DocketService::new(validator, docket_repo);

    let passwords = Arc::new(PasswordService::new(PasswordPolicy::default(), Argon2Config::default())?);
    let tokens = Arc::new(TokenService::new(TokenConfig::new(config.token_secret.clone()))?);
    let user_service = UserService::new(user_repo, passwords, tokens);

    let app = create_router(docket_service, user_service).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Docket Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received...");
}
