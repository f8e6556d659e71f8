// Port diagnostics service - Multi-single-port environment and IC/firmware rollups
use crate::application::batch_fetch::fetch_in_chunks;
use crate::application::chart_panel::CycleToken;
use crate::application::log_repository::LogRepository;
use crate::domain::dashboard::PortDiagnostics;
use crate::domain::port_diagnostics::{summarize, FirmwareOwners};
use crate::domain::time_range::TimeRange;
use crate::error::{DashboardError, Result};
use crate::infrastructure::config::MultiSinglePortSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct PortDiagnosticsService {
    repository: Arc<dyn LogRepository>,
    owners: Arc<FirmwareOwners>,
    chunk_days: i64,
}

impl PortDiagnosticsService {
    pub fn new(
        repository: Arc<dyn LogRepository>,
        owners: Arc<FirmwareOwners>,
        settings: MultiSinglePortSettings,
    ) -> Self {
        Self {
            repository,
            owners,
            chunk_days: settings.chunk_days,
        }
    }

    /// Fetch the range and roll it up. A cycle that has been superseded by
    /// the time its fetches land stops here and leaves the firmware registry
    /// untouched.
    pub async fn fetch_and_aggregate(&self, range: &TimeRange, token: &CycleToken) -> Result<PortDiagnostics> {
        let repository = &self.repository;
        let logs = fetch_in_chunks(range, self.chunk_days, |chunk| async move {
            repository.multi_single_port_logs(&chunk).await
        })
        .await?;

        if !token.is_current() {
            return Err(DashboardError::Superseded);
        }

        tracing::debug!("Summarizing {} multi-single-port logs", logs.len());
        Ok(summarize(&logs, &self.owners))
    }
}
