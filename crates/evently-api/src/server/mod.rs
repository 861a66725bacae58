//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use evently_cache::{MemorySessionStore, RedisPool, RedisSessionStore};
use evently_common::{AppConfig, AppError, SessionStoreKind};
use evently_core::SessionStore;
use evently_gateway::{
    GoTrueClient, RestAttendeeRepository, RestClient, RestEventRepository, RestProfileRepository,
};
use evently_service::{ServiceContextBuilder, ServiceSettings, SessionRegistry};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// How often idle session managers are dropped
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router, state.config());
    router.with_state(state)
}

/// Session persistence selected by configuration
fn create_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, AppError> {
    let ttl = config.session.ttl_seconds;
    match config.session.store {
        SessionStoreKind::Memory => {
            info!("Using in-process session store");
            Ok(Arc::new(MemorySessionStore::new(ttl)))
        }
        SessionStoreKind::Redis => {
            let redis = config
                .redis
                .as_ref()
                .ok_or_else(|| AppError::Config("REDIS_URL is required".to_string()))?;

            info!("Connecting to Redis...");
            let pool =
                RedisPool::from_config(redis).map_err(|e| AppError::SessionStore(e.to_string()))?;
            info!("Redis session store ready");
            Ok(Arc::new(RedisSessionStore::new(pool, ttl)))
        }
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!(url = %config.backend.url, "Configuring hosted backend client...");
    let client = Arc::new(RestClient::new(&config.backend)?);

    let session_store = create_session_store(&config)?;

    let service_context = ServiceContextBuilder::new()
        .event_repo(Arc::new(RestEventRepository::new(client.clone())))
        .profile_repo(Arc::new(RestProfileRepository::new(client.clone())))
        .attendee_repo(Arc::new(RestAttendeeRepository::new(client.clone())))
        .auth_provider(Arc::new(GoTrueClient::new(client)))
        .session_store(session_store)
        .settings(ServiceSettings::from(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(SessionRegistry::new(service_context), config))
}

/// Periodically drop session managers nobody has used for a while
pub fn spawn_session_pruner(state: &AppState) -> JoinHandle<()> {
    let sessions = state.sessions_handle();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            tick.tick().await;
            let pruned = sessions.prune_idle();
            debug!(pruned, active = sessions.len(), "Session prune pass");
        }
    })
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let pruner = spawn_session_pruner(&state);

    let app = create_app(state);
    let result = run_server(app, addr).await;

    pruner.abort();
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
