// In-memory LogRepository for service tests
use crate::application::log_repository::{LogRepository, ProgressFilter};
use crate::domain::logs::{MpLog, MultiSinglePortLog, ProjectProgress, SwitchToolLog};
use crate::domain::mp_task::MpTaskView;
use crate::domain::time_range::TimeRange;
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::sync::Mutex;

/// Serves canned records, each chunk getting those stamped in `[start, end)`.
#[derive(Default)]
pub struct FakeRepository {
    pub switch_tool: Vec<SwitchToolLog>,
    pub progress: Vec<ProjectProgress>,
    pub multi_single_port: Vec<MultiSinglePortLog>,
    pub mp: Vec<MpLog>,
    pub tasks: Vec<MpTaskView>,
    /// Chunks starting here fail with a 500
    pub fail_chunk_at: Option<DateTime<FixedOffset>>,
    pub calls: Mutex<Vec<(&'static str, TimeRange)>>,
}

impl FakeRepository {
    fn serve<T: Clone>(
        &self,
        endpoint: &'static str,
        range: &TimeRange,
        records: &[T],
        stamp: impl Fn(&T) -> DateTime<FixedOffset>,
    ) -> Result<Vec<T>> {
        self.calls.lock().unwrap().push((endpoint, *range));
        if self.fail_chunk_at == Some(range.start_at) {
            return Err(DashboardError::Http {
                endpoint: endpoint.to_string(),
                status: 500,
                reason: "Internal Server Error".to_string(),
            });
        }
        Ok(records
            .iter()
            .filter(|r| {
                let at = stamp(r);
                range.start_at <= at && at < range.end_at
            })
            .cloned()
            .collect())
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<TimeRange> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, r)| *r)
            .collect()
    }
}

#[async_trait]
impl LogRepository for FakeRepository {
    async fn switch_tool_logs(&self, range: &TimeRange) -> Result<Vec<SwitchToolLog>> {
        self.serve("switch_tool", range, &self.switch_tool, |r| r.timestamp)
    }

    async fn project_progress(&self, range: &TimeRange, _filter: ProgressFilter) -> Result<Vec<ProjectProgress>> {
        self.serve("progress", range, &self.progress, |r| r.establish_date)
    }

    async fn multi_single_port_logs(&self, range: &TimeRange) -> Result<Vec<MultiSinglePortLog>> {
        self.serve("multi_single_port", range, &self.multi_single_port, |r| r.timestamp)
    }

    async fn mp_logs(&self, range: &TimeRange) -> Result<Vec<MpLog>> {
        self.serve("mp", range, &self.mp, |r| r.start_at)
    }

    async fn mp_task_views(
        &self,
        from: &DateTime<FixedOffset>,
        to: &DateTime<FixedOffset>,
    ) -> Result<Vec<MpTaskView>> {
        self.calls
            .lock()
            .unwrap()
            .push(("mp_tasks", TimeRange::new(*from, *to)));
        Ok(self.tasks.clone())
    }
}
