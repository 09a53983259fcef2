//! Credential auth server.
//!
//! Reads configuration from TOML (~/.config/credauth/config.toml or
//! $CREDAUTH_CONFIG) and refuses to start without a token signing secret.

use std::sync::Arc;

use tracing::{error, info, warn};

use credauth::config::CONFIG_PATH_ENV;
use credauth::{
    create_api_router, default_config_path, init_database, AppConfig, AuthService,
    CredentialStore, InMemoryCredentialStore, PasswordHasher, SeaOrmCredentialStore, TokenIssuer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = AppConfig::load(&config_path);

    let level = app_cfg
        .as_ref()
        .map(|cfg| cfg.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    let app_cfg = match app_cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = app_cfg.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }
    info!("Configuration loaded from {}", config_path.display());

    info!("Starting credential auth service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()?;

    // ── Crypto ─────────────────────────────────────────────────
    let hasher = PasswordHasher::new(app_cfg.security.bcrypt_cost)?;
    let issuer = TokenIssuer::new(app_cfg.jwt_config());
    info!(
        bcrypt_cost = hasher.cost(),
        expiration_secs = app_cfg.security.jwt_expiration_secs,
        "Crypto configured"
    );

    // ── Credential store ───────────────────────────────────────
    let mut db = None;
    let store: Arc<dyn CredentialStore> = if app_cfg.database.in_memory {
        warn!("Using in-memory credential store; identities are lost on restart");
        Arc::new(InMemoryCredentialStore::new())
    } else {
        let conn = match init_database(&app_cfg.database_config()).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to initialise database: {}", e);
                return Err(e.into());
            }
        };
        db = Some(conn.clone());
        Arc::new(SeaOrmCredentialStore::new(conn))
    };

    let auth_service = Arc::new(AuthService::new(store, hasher, issuer));
    let api_router = create_api_router(auth_service, prometheus_handle);

    // ── REST API server with graceful shutdown ────────────────
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);

    let served = axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = &served {
        error!("REST API server error: {}", e);
    }

    if let Some(db) = db {
        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
    }

    info!("Credential auth service shutdown complete");
    served.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
