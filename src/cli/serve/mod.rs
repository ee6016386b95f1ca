//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::department::DepartmentService;
use crate::infrastructure::storage::{run_facility_migrations, Storage, StorageFactory};

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let storage = StorageFactory::create(&config.storage_config()?).await?;
    prepare_storage(&config, &storage).await?;

    let app = create_router(AppState::from_storage(storage));

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Migrate (when enabled and on Postgres) and seed the default department
async fn prepare_storage(config: &AppConfig, storage: &Storage) -> anyhow::Result<()> {
    if let Some(pool) = &storage.pool {
        if config.database.auto_migrate {
            let applied = run_facility_migrations(pool).await?;
            info!(applied, "Database migrations complete");
        }
    }

    if config.seed.enabled {
        DepartmentService::new(storage.departments.clone())
            .ensure_seeded(&config.seed.department_name, &config.seed.department_buffs)
            .await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
