// TIC backend repository implementation over HTTP/JSON
use crate::application::log_repository::{LogRepository, ProgressFilter};
use crate::domain::logs::{MpLog, MultiSinglePortLog, ProjectProgress, SwitchToolLog};
use crate::domain::mp_task::MpTaskView;
use crate::domain::time_range::{to_wire_timestamp, TimeRange};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SWITCH_TOOL_LOGS: &str = "switch_tool_log_detail";
const PROJECT_PROGRESS: &str = "project/progress";
const MULTI_SINGLE_PORT_LOGS: &str = "multi_single_port_log_detail";
const MP_LOGS: &str = "mp_logs";
const MP_TASK_VIEW: &str = "view/mp";

#[derive(Debug, Clone)]
pub struct HttpLogRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeRequest {
    start_at: String,
    end_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRequest {
    start_at: String,
    end_at: String,
    action_mode: i32,
    progress_threshold: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MpLogRequest {
    begin_at: String,
    end_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwitchToolLogResponse {
    switch_tool_logs_detail: Vec<SwitchToolLog>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectProgressResponse {
    project_progress: Vec<ProjectProgress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiSinglePortLogResponse {
    multi_single_port_logs_detail: Vec<MultiSinglePortLog>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MpLogResponse {
    mp_logs: Vec<MpLog>,
}

#[derive(Debug, Deserialize)]
struct MpTaskViewResponse {
    tasks: Vec<MpTaskView>,
}

impl RangeRequest {
    fn new(range: &TimeRange) -> Self {
        Self {
            start_at: to_wire_timestamp(&range.start_at),
            end_at: to_wire_timestamp(&range.end_at),
        }
    }
}

impl HttpLogRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::from_reqwest(&base_url, e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.endpoint_url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    async fn execute<R: DeserializeOwned>(&self, endpoint: &str, request: reqwest::RequestBuilder) -> Result<R> {
        tracing::debug!("Calling TIC endpoint {}", endpoint);

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DashboardError::from_reqwest(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::from_reqwest(endpoint, e))?;

        serde_json::from_str(&body)
            .map_err(|e| DashboardError::Malformed(format!("{} response: {}", endpoint, e)))
    }
}

#[async_trait]
impl LogRepository for HttpLogRepository {
    async fn switch_tool_logs(&self, range: &TimeRange) -> Result<Vec<SwitchToolLog>> {
        let response: SwitchToolLogResponse = self
            .post_json(SWITCH_TOOL_LOGS, &RangeRequest::new(range))
            .await?;
        Ok(response.switch_tool_logs_detail)
    }

    async fn project_progress(&self, range: &TimeRange, filter: ProgressFilter) -> Result<Vec<ProjectProgress>> {
        let request = ProgressRequest {
            start_at: to_wire_timestamp(&range.start_at),
            end_at: to_wire_timestamp(&range.end_at),
            action_mode: filter.action_mode,
            progress_threshold: filter.progress_threshold,
        };
        let response: ProjectProgressResponse = self.post_json(PROJECT_PROGRESS, &request).await?;
        Ok(response.project_progress)
    }

    async fn multi_single_port_logs(&self, range: &TimeRange) -> Result<Vec<MultiSinglePortLog>> {
        let response: MultiSinglePortLogResponse = self
            .post_json(MULTI_SINGLE_PORT_LOGS, &RangeRequest::new(range))
            .await?;
        Ok(response.multi_single_port_logs_detail)
    }

    async fn mp_logs(&self, range: &TimeRange) -> Result<Vec<MpLog>> {
        let request = MpLogRequest {
            begin_at: to_wire_timestamp(&range.start_at),
            end_at: to_wire_timestamp(&range.end_at),
        };
        let response: MpLogResponse = self.post_json(MP_LOGS, &request).await?;
        Ok(response.mp_logs)
    }

    async fn mp_task_views(
        &self,
        from: &DateTime<FixedOffset>,
        to: &DateTime<FixedOffset>,
    ) -> Result<Vec<MpTaskView>> {
        let url = format!(
            "{}?create_time_from={}&create_time_to={}",
            self.endpoint_url(MP_TASK_VIEW),
            urlencoding::encode(&to_wire_timestamp(from)),
            urlencoding::encode(&to_wire_timestamp(to))
        );
        let response: MpTaskViewResponse = self.execute(MP_TASK_VIEW, self.client.get(url)).await?;
        Ok(response.tasks)
    }
}
