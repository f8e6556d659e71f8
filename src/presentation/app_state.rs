// Application state for HTTP handlers
use crate::application::chart_panel::{ChartPanel, RefreshOutcome};
use crate::application::mp_service::MpService;
use crate::application::port_diagnostics_service::PortDiagnosticsService;
use crate::application::switch_tool_service::SwitchToolService;
use crate::domain::chart::ChartSpec;
use crate::domain::dashboard::{MpCountChartData, PortDiagnostics, SwitchToolChartData};
use crate::domain::palette::HashPalette;
use crate::domain::time_range::PendingRange;
use crate::error::Result;
use crate::infrastructure::chart_mapper::{environment_chart, ic_firmware_chart, mp_count_chart, switch_tool_chart};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelId {
    SwitchTool,
    MpCount,
    MultiSinglePort,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::SwitchTool, PanelId::MpCount, PanelId::MultiSinglePort];
}

/// What a panel currently shows, ready for the browser.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub loading: bool,
    pub last_error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub charts: Vec<ChartSpec>,
}

pub struct AppState {
    pub switch_tool_service: SwitchToolService,
    pub mp_service: MpService,
    pub port_diagnostics_service: PortDiagnosticsService,
    pub switch_tool_panel: ChartPanel<SwitchToolChartData>,
    pub mp_count_panel: ChartPanel<MpCountChartData>,
    pub multi_single_port_panel: ChartPanel<PortDiagnostics>,
    pub palette: HashPalette,
    pub mp_task_lookback_hours: i64,
}

impl AppState {
    pub fn new(
        switch_tool_service: SwitchToolService,
        mp_service: MpService,
        port_diagnostics_service: PortDiagnosticsService,
        mp_task_lookback_hours: i64,
    ) -> Self {
        Self {
            switch_tool_service,
            mp_service,
            port_diagnostics_service,
            switch_tool_panel: ChartPanel::new("switch-tool", SwitchToolChartData::default()),
            mp_count_panel: ChartPanel::new("mp-count", MpCountChartData::default()),
            multi_single_port_panel: ChartPanel::new("multi-single-port", PortDiagnostics::default()),
            palette: HashPalette::default(),
            mp_task_lookback_hours,
        }
    }

    /// Run one refresh cycle of `panel` over `pending`.
    pub async fn refresh(&self, panel: PanelId, pending: PendingRange) -> Result<RefreshOutcome> {
        match panel {
            PanelId::SwitchTool => {
                let service = &self.switch_tool_service;
                self.switch_tool_panel
                    .refresh(pending, |range, _| async move { service.fetch_and_aggregate(&range).await })
                    .await
            }
            PanelId::MpCount => {
                let service = &self.mp_service;
                self.mp_count_panel
                    .refresh(pending, |range, _| async move { service.mp_count(&range).await })
                    .await
            }
            PanelId::MultiSinglePort => {
                let service = &self.port_diagnostics_service;
                self.multi_single_port_panel
                    .refresh(pending, |range, token| async move {
                        service.fetch_and_aggregate(&range, &token).await
                    })
                    .await
            }
        }
    }

    pub async fn view(&self, panel: PanelId) -> PanelView {
        match panel {
            PanelId::SwitchTool => {
                let snapshot = self.switch_tool_panel.snapshot().await;
                PanelView {
                    loading: snapshot.loading,
                    last_error: snapshot.last_error,
                    refreshed_at: snapshot.refreshed_at,
                    charts: vec![switch_tool_chart(&snapshot.data)],
                }
            }
            PanelId::MpCount => {
                let snapshot = self.mp_count_panel.snapshot().await;
                PanelView {
                    loading: snapshot.loading,
                    last_error: snapshot.last_error,
                    refreshed_at: snapshot.refreshed_at,
                    charts: vec![mp_count_chart(&snapshot.data)],
                }
            }
            PanelId::MultiSinglePort => {
                let snapshot = self.multi_single_port_panel.snapshot().await;
                PanelView {
                    loading: snapshot.loading,
                    last_error: snapshot.last_error,
                    refreshed_at: snapshot.refreshed_at,
                    charts: vec![
                        environment_chart(&snapshot.data),
                        ic_firmware_chart(&snapshot.data, &self.palette),
                    ],
                }
            }
        }
    }
}
