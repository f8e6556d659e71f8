// Raw log records returned by the TIC backend
use crate::error::{DashboardError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// A record that can be bucketed by category and ISO week.
pub trait WeeklyRecord {
    fn category(&self) -> &str;
    fn occurred_at(&self) -> &DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchToolLog {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tester_name: String,
    #[serde(default)]
    pub current_tool: String,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub ic_id: String,
    pub ic: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl WeeklyRecord for SwitchToolLog {
    fn category(&self) -> &str {
        &self.ic
    }

    fn occurred_at(&self) -> &DateTime<FixedOffset> {
        &self.timestamp
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    #[serde(default)]
    pub pj_id: String,
    pub ic: String,
    #[serde(default)]
    pub progress: String,
    pub establish_date: DateTime<FixedOffset>,
    pub duration: String,
}

impl ProjectProgress {
    pub fn duration_hours(&self) -> Result<f64> {
        parse_duration_hours(&self.duration)
    }
}

impl WeeklyRecord for ProjectProgress {
    fn category(&self) -> &str {
        &self.ic
    }

    fn occurred_at(&self) -> &DateTime<FixedOffset> {
        &self.establish_date
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSinglePortLog {
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub normal_sample_count: u64,
    pub server_port: String,
    #[serde(default, rename = "pps2MultiSinglePortSampleIds")]
    pub sample_ids: Vec<String>,
    #[serde(default, rename = "pps2MultiSinglePortSamples")]
    pub samples: Vec<MultiSinglePortSample>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSinglePortSample {
    #[serde(default)]
    pub id: String,
    pub fw: String,
    pub ic: String,
    #[serde(default)]
    pub ctrl_id: String,
    #[serde(default)]
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MpLog {
    #[serde(default)]
    pub mp_log_id: String,
    #[serde(default)]
    pub pj_id: String,
    #[serde(default)]
    pub action_mode: i64,
    #[serde(default)]
    pub tk_id: String,
    #[serde(default)]
    pub tester_name: String,
    pub ic: String,
    #[serde(default)]
    pub fw_version: String,
    #[serde(default)]
    pub fw_sub_version: String,
    #[serde(default)]
    pub user_real_name: String,
    #[serde(default)]
    pub force_mp: bool,
    #[serde(default)]
    pub mp_environment: i64,
    #[serde(default)]
    pub mp_result: i64,
    #[serde(default)]
    pub mp_error_code: String,
    #[serde(default)]
    pub memo: String,
    pub start_at: DateTime<FixedOffset>,
    pub end_at: Option<DateTime<FixedOffset>>,
}

impl WeeklyRecord for MpLog {
    fn category(&self) -> &str {
        &self.ic
    }

    fn occurred_at(&self) -> &DateTime<FixedOffset> {
        &self.start_at
    }
}

/// The backend reports some counters as decimal strings.
fn count_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Parse a duration such as `PT5H`, `PT1H30M` or `1h30m0s` into hours.
///
/// Case-insensitive, the `PT`/`P` designators are optional, and an optional
/// leading `<n>D` day part is accepted before `T`.
pub fn parse_duration_hours(raw: &str) -> Result<f64> {
    let malformed = || DashboardError::Malformed(format!("invalid duration '{}'", raw));

    let upper = raw.trim().to_ascii_uppercase();
    let body = upper.strip_prefix('P').unwrap_or(&upper);
    let body = body.strip_prefix('T').unwrap_or(body);
    if body.is_empty() {
        return Err(malformed());
    }

    let mut seconds = 0.0;
    let mut rest = body;
    while !rest.is_empty() {
        // days may be followed by the `T` time designator
        if let Some(after) = rest.strip_prefix('T') {
            rest = after;
            continue;
        }

        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(malformed());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| malformed())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| !c.is_alphabetic() || c == 'T')
            .unwrap_or(rest.len());
        let unit_seconds = match &rest[..unit_len] {
            "D" => 86_400.0,
            "H" => 3_600.0,
            "M" => 60.0,
            "S" => 1.0,
            "MS" => 1e-3,
            "US" | "µS" => 1e-6,
            "NS" => 1e-9,
            _ => return Err(malformed()),
        };
        seconds += value * unit_seconds;
        rest = &rest[unit_len..];
    }

    Ok(seconds / 3_600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(parse_duration_hours("PT5H").unwrap(), 5.0);
        assert_eq!(parse_duration_hours("PT0H").unwrap(), 0.0);
        assert_eq!(parse_duration_hours("PT1H30M").unwrap(), 1.5);
        assert_eq!(parse_duration_hours("1h30m0s").unwrap(), 1.5);
        assert_eq!(parse_duration_hours("pt2.5h").unwrap(), 2.5);
        assert_eq!(parse_duration_hours("P1DT2H").unwrap(), 26.0);
        assert_eq!(parse_duration_hours("PT90M").unwrap(), 1.5);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(matches!(parse_duration_hours(""), Err(DashboardError::Malformed(_))));
        assert!(matches!(parse_duration_hours("PT"), Err(DashboardError::Malformed(_))));
        assert!(matches!(parse_duration_hours("PTxH"), Err(DashboardError::Malformed(_))));
        assert!(matches!(parse_duration_hours("PT5Y"), Err(DashboardError::Malformed(_))));
    }

    #[test]
    fn test_multi_single_port_log_accepts_string_count() {
        let log: MultiSinglePortLog = serde_json::from_value(serde_json::json!({
            "message": "scan",
            "normalSampleCount": "12",
            "serverPort": "9001",
            "pps2MultiSinglePortSampleIds": ["a"],
            "pps2MultiSinglePortSamples": [
                {"id": "a", "fw": "FW1", "ic": "ICA", "ctrlId": "c0", "ip": "10.0.0.1"}
            ],
            "timestamp": "2024-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(log.normal_sample_count, 12);
        assert_eq!(log.samples[0].fw, "FW1");
    }

    #[test]
    fn test_multi_single_port_log_rejects_bad_count() {
        let result = serde_json::from_value::<MultiSinglePortLog>(serde_json::json!({
            "normalSampleCount": "twelve",
            "serverPort": "9001",
            "timestamp": "2024-01-02T03:04:05Z"
        }));
        assert!(result.is_err());
    }
}
