// MP task view: raw backend join and the flattened table row
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MpTaskView {
    pub mp_task: MpTask,
    pub mp_project: MpProject,
    pub mp_log: MpTaskLog,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MpTask {
    pub tk_id: i64,
    pub tl_id: i64,
    pub main_tk_id: i64,
    pub test_status: i64,
    pub test_result: i64,
    pub test_result_path: String,
    pub tool_extra_params: String,
    pub idle_start_time: String,
    pub prepare_start_time: String,
    pub test_end_time: String,
    pub tool_name: String,
    pub test_status_name: String,
    pub test_result_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MpProject {
    pub pj_id: i64,
    pub setting_file: String,
    pub memo: String,
    pub force_pcie_flow_name: String,
    pub force_boot_code_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MpTaskLog {
    pub mp_log_id: i64,
    pub user_real_name: String,
    pub tester_name: String,
    pub ic: String,
    pub fw_version: String,
    pub fw_sub_version: String,
    pub mp_environment: i64,
    pub mp_result: i64,
    pub mp_error_code: String,
    pub mp_result_name: String,
    pub mp_environment_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MpTaskRow {
    pub pj_id: i64,
    pub force_pcie_flow_name: String,
    pub force_boot_code_name: String,
    pub user_real_name: String,
    pub ip: String,
    pub controller_id: String,
    pub ic: String,
    pub fw_version: String,
    pub fw_sub_version: String,
    pub mp_error_code: String,
    pub mp_result_name: String,
    pub mp_environment_name: String,
    pub tk_id: i64,
    pub idle_start_time: String,
    pub prepare_start_time: String,
    pub test_end_time: String,
    pub tool_name: String,
    pub test_status_name: String,
    pub test_result_name: String,
}

impl MpTaskRow {
    /// Flatten a task view. Tester names look like `<host>_<ip>_<controller>`;
    /// views whose tester name has fewer than three parts are dropped.
    pub fn from_view(view: MpTaskView) -> Option<Self> {
        let (ip, controller_id) = Self::parse_tester_name(&view.mp_log.tester_name)?;
        let MpTaskView {
            mp_task: task,
            mp_project: project,
            mp_log: log,
        } = view;

        Some(Self {
            pj_id: project.pj_id,
            force_pcie_flow_name: project.force_pcie_flow_name,
            force_boot_code_name: project.force_boot_code_name,
            user_real_name: log.user_real_name,
            ip,
            controller_id,
            ic: log.ic,
            fw_version: log.fw_version,
            fw_sub_version: log.fw_sub_version,
            mp_error_code: log.mp_error_code,
            mp_result_name: log.mp_result_name,
            mp_environment_name: log.mp_environment_name,
            tk_id: task.tk_id,
            idle_start_time: task.idle_start_time,
            prepare_start_time: task.prepare_start_time,
            test_end_time: task.test_end_time,
            tool_name: task.tool_name,
            test_status_name: task.test_status_name,
            test_result_name: task.test_result_name,
        })
    }

    fn parse_tester_name(tester_name: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = tester_name.split('_').collect();
        if parts.len() < 3 {
            return None;
        }
        Some((parts[1].to_string(), parts[2].to_string()))
    }
}
