// Switch tool service - Switch amount and project progress per IC per week
use crate::application::batch_fetch::fetch_in_chunks;
use crate::application::log_repository::{LogRepository, ProgressFilter};
use crate::domain::aggregation::{average_duration_per_week, count_per_week};
use crate::domain::dashboard::SwitchToolChartData;
use crate::domain::time_range::TimeRange;
use crate::error::Result;
use crate::infrastructure::config::SwitchToolSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct SwitchToolService {
    repository: Arc<dyn LogRepository>,
    settings: SwitchToolSettings,
}

impl SwitchToolService {
    pub fn new(repository: Arc<dyn LogRepository>, settings: SwitchToolSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn fetch_and_aggregate(&self, range: &TimeRange) -> Result<SwitchToolChartData> {
        let repository = &self.repository;
        let chunk_days = self.settings.chunk_days;
        let filter = ProgressFilter {
            action_mode: self.settings.action_mode,
            progress_threshold: self.settings.progress_threshold,
        };

        let (logs, progress) = tokio::try_join!(
            fetch_in_chunks(range, chunk_days, |chunk| async move {
                repository.switch_tool_logs(&chunk).await
            }),
            fetch_in_chunks(range, chunk_days, |chunk| async move {
                repository.project_progress(&chunk, filter).await
            }),
        )?;
        tracing::debug!(
            "Aggregating {} switch tool logs and {} progress records",
            logs.len(),
            progress.len()
        );

        let object_ics = (!self.settings.object_ics.is_empty()).then_some(self.settings.object_ics.as_slice());
        let amount = count_per_week(&logs, range, object_ics);
        let average = average_duration_per_week(&progress, range, object_ics)?;

        Ok(SwitchToolChartData::new(amount, average))
    }
}
