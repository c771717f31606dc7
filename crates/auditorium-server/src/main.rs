mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use auditorium_api::AppStateInner;
use auditorium_remote::SupabaseClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auditorium=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {:#}.", e);
            eprintln!("       Set it in your .env file and restart.");
            std::process::exit(1);
        }
    };

    info!("Backend: {}", config.supabase_url);
    info!("Public URL: {}", config.site_url);
    info!(
        "Login required to reserve: {}, backend timeout: {}s",
        config.require_login,
        config.remote_timeout.as_secs()
    );
    if config.service_role_key.is_none() {
        warn!("SUPABASE_SERVICE_ROLE_KEY not set, account deletion is disabled");
    }

    let backend = Arc::new(SupabaseClient::new(config.remote())?);

    let state = Arc::new(AppStateInner {
        backend,
        site_url: config.site_url.clone(),
        require_login: config.require_login,
    });

    let app = auditorium_api::router(state, config.session_key(), config.secure_cookies())
        .layer(TraceLayer::new_for_http());

    let listener = bind(&config.host, config.port).await?;
    info!("Auditorium reservations listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Accepts IP literals of either family as well as host names.
async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("cannot listen on {} port {}", host, port))
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
