//! # TaskDeck API Server
//!
//! HTTP backend for the TaskDeck task-management application: accounts
//! with roles, task CRUD with drag-and-drop ordering, subtasks, due
//! reminders, analytics, and an admin console.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskdeck-api
//! ```

use std::sync::Arc;

use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::db::migrations::{ensure_admin_user, run_migrations};
use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
use taskdeck_shared::reminders::smtp::SmtpNotifier;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskDeck API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    if let Some(admin_password) = &config.admin_password {
        if ensure_admin_user(&pool, admin_password).await? {
            tracing::info!("Admin user created (username: admin)");
        }
    }

    if !config.smtp_configured() {
        tracing::warn!("SMTP relay not configured; reminder delivery will fail soft");
    }

    let notifier = Arc::new(SmtpNotifier::new(config.smtp.clone()));

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, notifier);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received, draining connections...");
}
