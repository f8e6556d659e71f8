// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::{Days, Local};
use tracing_subscriber::EnvFilter;

use crate::application::mp_service::MpService;
use crate::application::port_diagnostics_service::PortDiagnosticsService;
use crate::application::switch_tool_service::SwitchToolService;
use crate::domain::port_diagnostics::FirmwareOwners;
use crate::domain::time_range::{PendingRange, TimeRange};
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_log_repository::HttpLogRepository;
use crate::presentation::app_state::{AppState, PanelId};
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpLogRepository::new(
        config.base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?);

    // Create services (application layer)
    let owners = Arc::new(FirmwareOwners::new());
    let state = Arc::new(AppState::new(
        SwitchToolService::new(repository.clone(), config.panels.switch_tool),
        MpService::new(repository.clone(), config.panels.mp_count),
        PortDiagnosticsService::new(repository, owners, config.panels.multi_single_port),
        config.mp_tasks.lookback_hours,
    ));

    // Every panel starts out covering yesterday 00:00 until now
    let initial = initial_range();
    for panel in PanelId::ALL {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = state.refresh(panel, initial).await {
                tracing::error!("Initial refresh of {:?} failed: {}", panel, e);
            }
        });
    }

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen_addr {}", config.listen_addr))?;
    tracing::info!("Starting tic-dashboard on {} against {}", addr, config.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}

fn initial_range() -> PendingRange {
    let now = Local::now();
    let start = now
        .date_naive()
        .checked_sub_days(Days::new(1))
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest());

    match start {
        Some(start) => PendingRange::from(TimeRange::new(start.fixed_offset(), now.fixed_offset())),
        None => PendingRange::default(),
    }
}
