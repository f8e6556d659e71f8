// MP service - MP run counts per IC per week and the recent MP task table
use crate::application::batch_fetch::fetch_in_chunks;
use crate::application::log_repository::LogRepository;
use crate::domain::aggregation::{mp_count_per_week, MpLogFilter};
use crate::domain::dashboard::MpCountChartData;
use crate::domain::mp_task::MpTaskRow;
use crate::domain::time_range::TimeRange;
use crate::error::{DashboardError, Result};
use crate::infrastructure::config::MpCountSettings;
use chrono::{DateTime, Duration, FixedOffset, Local};
use std::sync::Arc;

#[derive(Clone)]
pub struct MpService {
    repository: Arc<dyn LogRepository>,
    chunk_days: i64,
    filter: MpLogFilter,
}

impl MpService {
    pub fn new(repository: Arc<dyn LogRepository>, settings: MpCountSettings) -> Self {
        Self {
            repository,
            chunk_days: settings.chunk_days,
            filter: MpLogFilter {
                ics: settings.ics,
                fw_prefixes: settings.fw_prefixes,
            },
        }
    }

    pub async fn mp_count(&self, range: &TimeRange) -> Result<MpCountChartData> {
        let repository = &self.repository;
        let logs = fetch_in_chunks(range, self.chunk_days, |chunk| async move {
            repository.mp_logs(&chunk).await
        })
        .await?;
        tracing::debug!("Counting {} MP logs", logs.len());

        Ok(MpCountChartData::new(mp_count_per_week(&logs, range, &self.filter)))
    }

    /// Tasks created between `from` and `to`, flattened into table rows.
    pub async fn list_tasks(&self, from: &DateTime<FixedOffset>, to: &DateTime<FixedOffset>) -> Result<Vec<MpTaskRow>> {
        let views = self.repository.mp_task_views(from, to).await?;
        let total = views.len();
        let rows: Vec<MpTaskRow> = views.into_iter().filter_map(MpTaskRow::from_view).collect();
        if rows.len() < total {
            tracing::warn!("Skipped {} MP task(s) with an unparseable tester name", total - rows.len());
        }
        Ok(rows)
    }

    /// Tasks created in the last `hours` hours. `hours` must be positive and
    /// reach back no further than the earliest representable timestamp.
    pub async fn recent_tasks(&self, hours: i64) -> Result<Vec<MpTaskRow>> {
        let to = Local::now().fixed_offset();
        let from = (hours > 0)
            .then(|| Duration::try_hours(hours))
            .flatten()
            .and_then(|lookback| to.checked_sub_signed(lookback))
            .ok_or(DashboardError::InvalidLookback { hours })?;
        self.list_tasks(&from, &to).await
    }
}
