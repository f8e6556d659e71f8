// Aggregated payloads backing each dashboard panel
use super::series::SeriesByCategory;
use serde::Serialize;

pub use super::port_diagnostics::PortDiagnostics;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchToolChartData {
    pub amount_by_week: Vec<SeriesByCategory<u64>>,
    pub average_progress_hours_by_week: Vec<SeriesByCategory<Option<f64>>>,
}

impl SwitchToolChartData {
    pub fn new(
        amount_by_week: Vec<SeriesByCategory<u64>>,
        average_progress_hours_by_week: Vec<SeriesByCategory<Option<f64>>>,
    ) -> Self {
        Self {
            amount_by_week,
            average_progress_hours_by_week,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MpCountChartData {
    pub mp_count_by_week: Vec<SeriesByCategory<u64>>,
}

impl MpCountChartData {
    pub fn new(mp_count_by_week: Vec<SeriesByCategory<u64>>) -> Self {
        Self { mp_count_by_week }
    }
}
