// Repository trait for TIC log data access
use crate::domain::logs::{MpLog, MultiSinglePortLog, ProjectProgress, SwitchToolLog};
use crate::domain::mp_task::MpTaskView;
use crate::domain::time_range::TimeRange;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Extra filter sent with project progress queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressFilter {
    pub action_mode: i32,
    pub progress_threshold: i32,
}

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Switch tool log details within the range
    async fn switch_tool_logs(&self, range: &TimeRange) -> Result<Vec<SwitchToolLog>>;

    /// Project progress records established within the range
    async fn project_progress(&self, range: &TimeRange, filter: ProgressFilter) -> Result<Vec<ProjectProgress>>;

    /// PPS2 multi-single-port diagnostic logs within the range
    async fn multi_single_port_logs(&self, range: &TimeRange) -> Result<Vec<MultiSinglePortLog>>;

    /// Mass production logs started within the range
    async fn mp_logs(&self, range: &TimeRange) -> Result<Vec<MpLog>>;

    /// MP task views created between `from` and `to`
    async fn mp_task_views(
        &self,
        from: &DateTime<FixedOffset>,
        to: &DateTime<FixedOffset>,
    ) -> Result<Vec<MpTaskView>>;
}
