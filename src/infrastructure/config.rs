use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Backend base URL, from `TIC_BASE_URL`
    pub base_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub panels: PanelsConfig,
    #[serde(default)]
    pub mp_tasks: MpTasksConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PanelsConfig {
    #[serde(default)]
    pub switch_tool: SwitchToolSettings,
    #[serde(default)]
    pub multi_single_port: MultiSinglePortSettings,
    #[serde(default)]
    pub mp_count: MpCountSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SwitchToolSettings {
    pub chunk_days: i64,
    /// ICs charted; empty means every IC seen in the logs
    pub object_ics: Vec<String>,
    pub action_mode: i32,
    pub progress_threshold: i32,
}

impl Default for SwitchToolSettings {
    fn default() -> Self {
        Self {
            chunk_days: 10,
            object_ics: ["PS5021", "PS5022", "PS5025", "PS5026", "PS5027"]
                .iter()
                .map(|ic| ic.to_string())
                .collect(),
            action_mode: 6,
            progress_threshold: 70,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MultiSinglePortSettings {
    pub chunk_days: i64,
}

impl Default for MultiSinglePortSettings {
    fn default() -> Self {
        Self { chunk_days: 3 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MpCountSettings {
    pub chunk_days: i64,
    pub ics: Vec<String>,
    pub fw_prefixes: Vec<String>,
}

impl Default for MpCountSettings {
    fn default() -> Self {
        Self {
            chunk_days: 10,
            ics: vec!["PS5302".to_string(), "PS5027".to_string()],
            fw_prefixes: vec!["VADL".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MpTasksConfig {
    pub lookback_hours: i64,
}

impl Default for MpTasksConfig {
    fn default() -> Self {
        Self { lookback_hours: 12 }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Load `config/dashboard.*` (optional) overlaid with `TIC_*` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_from(
        config::Environment::with_prefix("TIC")
            .prefix_separator("_")
            .separator("__"),
    )
}

fn load_from(env: config::Environment) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("TIC")
            .prefix_separator("_")
            .separator("__")
            .source(Some(source))
    }

    #[test]
    fn test_defaults_with_base_url_only() {
        let cfg = load_from(env(&[("TIC_BASE_URL", "http://tic.local/v1")])).unwrap();

        assert_eq!(cfg.base_url, "http://tic.local/v1");
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.panels.switch_tool.chunk_days, 10);
        assert_eq!(cfg.panels.switch_tool.object_ics.len(), 5);
        assert_eq!(cfg.panels.multi_single_port.chunk_days, 3);
        assert_eq!(cfg.panels.mp_count.fw_prefixes, vec!["VADL"]);
        assert_eq!(cfg.mp_tasks.lookback_hours, 12);
    }

    #[test]
    fn test_nested_override() {
        let cfg = load_from(env(&[
            ("TIC_BASE_URL", "http://tic.local/v1"),
            ("TIC_PANELS__MULTI_SINGLE_PORT__CHUNK_DAYS", "5"),
        ]))
        .unwrap();

        assert_eq!(cfg.panels.multi_single_port.chunk_days, 5);
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        assert!(load_from(env(&[])).is_err());
    }
}
