// Multi-single-port diagnostic rollups
use super::logs::MultiSinglePortLog;
use super::series::PieSlice;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

pub const NORMAL_ENV: &str = "Normal env";
pub const MULTI_SINGLE_PORT: &str = "Multi-single port";

/// Remembers which IC a firmware belongs to across refresh cycles.
///
/// The first IC observed for a firmware is kept; later observations never
/// replace it.
#[derive(Debug, Default)]
pub struct FirmwareOwners {
    owners: Mutex<HashMap<String, String>>,
}

impl FirmwareOwners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, fw: &str, ic: &str) {
        let mut owners = self.owners.lock().unwrap_or_else(|e| e.into_inner());
        owners.entry(fw.to_string()).or_insert_with(|| ic.to_string());
    }

    pub fn owner_of(&self, fw: &str) -> Option<String> {
        let owners = self.owners.lock().unwrap_or_else(|e| e.into_inner());
        owners.get(fw).cloned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDiagnostics {
    pub env_count: Vec<PieSlice>,
    pub ic_count: Vec<PieSlice>,
    pub fw_count: Vec<PieSlice>,
    /// Owning IC of every firmware in `fw_count`, as known when aggregated
    pub fw_owner: BTreeMap<String, String>,
}

/// Run both rollups over one cycle's logs.
pub fn summarize(logs: &[MultiSinglePortLog], owners: &FirmwareOwners) -> PortDiagnostics {
    let env_count = environment_counts(logs);
    let (ic_count, fw_count, fw_owner) = ic_firmware_counts(logs, owners);
    PortDiagnostics {
        env_count,
        ic_count,
        fw_count,
        fw_owner,
    }
}

/// Normal vs multi-single-port sample counts: averaged per server port
/// (rounded up), then summed over ports. Empty input gives no slices.
pub fn environment_counts(logs: &[MultiSinglePortLog]) -> Vec<PieSlice> {
    if logs.is_empty() {
        return Vec::new();
    }

    // port -> (normal total, multi total, log count)
    let mut by_port: BTreeMap<&str, (u64, u64, u64)> = BTreeMap::new();
    for log in logs {
        let entry = by_port.entry(log.server_port.as_str()).or_default();
        entry.0 += log.normal_sample_count;
        entry.1 += log.samples.len() as u64;
        entry.2 += 1;
    }

    let (normal, multi) = by_port
        .values()
        .fold((0, 0), |(normal, multi), &(n, m, count)| {
            (normal + n.div_ceil(count), multi + m.div_ceil(count))
        });

    vec![
        PieSlice::new(NORMAL_ENV, normal),
        PieSlice::new(MULTI_SINGLE_PORT, multi),
    ]
}

/// Per-firmware and per-IC multi-single-port occurrence counts.
///
/// Only logs carrying samples count. Per server port, each firmware's
/// occurrences are divided by that port's log count (rounded up) and summed
/// over ports; firmware counts then roll up to their owning IC.
pub fn ic_firmware_counts(
    logs: &[MultiSinglePortLog],
    owners: &FirmwareOwners,
) -> (Vec<PieSlice>, Vec<PieSlice>, BTreeMap<String, String>) {
    // port -> (logs with samples, fw -> occurrences)
    let mut by_port: BTreeMap<&str, (u64, BTreeMap<&str, u64>)> = BTreeMap::new();
    for log in logs.iter().filter(|l| !l.samples.is_empty()) {
        let (log_count, fw_counts) = by_port.entry(log.server_port.as_str()).or_default();
        *log_count += 1;
        for sample in &log.samples {
            *fw_counts.entry(sample.fw.as_str()).or_default() += 1;
            owners.record(&sample.fw, &sample.ic);
        }
    }

    let mut fw_average: BTreeMap<&str, u64> = BTreeMap::new();
    for (log_count, fw_counts) in by_port.values() {
        for (fw, count) in fw_counts {
            *fw_average.entry(*fw).or_default() += count.div_ceil(*log_count);
        }
    }

    let mut fw_owner = BTreeMap::new();
    let mut ic_total: BTreeMap<String, u64> = BTreeMap::new();
    for (fw, count) in &fw_average {
        let Some(ic) = owners.owner_of(fw) else {
            continue;
        };
        *ic_total.entry(ic.clone()).or_default() += count;
        fw_owner.insert(fw.to_string(), ic);
    }

    let ic_count = ic_total
        .into_iter()
        .map(|(ic, value)| PieSlice::new(ic, value))
        .collect();
    let fw_count = fw_average
        .into_iter()
        .map(|(fw, value)| PieSlice::new(fw, value))
        .collect();

    (ic_count, fw_count, fw_owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(port: &str, normal: u64, samples: &[(&str, &str)]) -> MultiSinglePortLog {
        let samples: Vec<_> = samples
            .iter()
            .map(|(fw, ic)| serde_json::json!({ "fw": fw, "ic": ic }))
            .collect();
        serde_json::from_value(serde_json::json!({
            "normalSampleCount": normal.to_string(),
            "serverPort": port,
            "pps2MultiSinglePortSamples": samples,
            "timestamp": "2024-01-02T00:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_environment_counts_average_per_port_then_sum() {
        let logs = vec![
            log("9001", 10, &[("FW1", "ICA")]),
            log("9001", 11, &[]),
            log("9002", 4, &[("FW1", "ICA"), ("FW2", "ICB"), ("FW2", "ICB")]),
        ];

        let slices = environment_counts(&logs);

        // port 9001: ceil(21/2)=11 normal, ceil(1/2)=1 multi; port 9002: 4 and 3
        assert_eq!(
            slices,
            vec![PieSlice::new(NORMAL_ENV, 15), PieSlice::new(MULTI_SINGLE_PORT, 4)]
        );
    }

    #[test]
    fn test_environment_counts_empty() {
        assert!(environment_counts(&[]).is_empty());
    }

    #[test]
    fn test_ic_firmware_counts() {
        let owners = FirmwareOwners::new();
        let logs = vec![
            log("9001", 0, &[("FW1", "ICA"), ("FW1", "ICA"), ("FW2", "ICA")]),
            log("9001", 0, &[("FW1", "ICA")]),
            log("9001", 0, &[]),
            log("9002", 0, &[("FW3", "ICB")]),
        ];

        let (ic_count, fw_count, fw_owner) = ic_firmware_counts(&logs, &owners);

        // port 9001 has two logs with samples: FW1 ceil(3/2)=2, FW2 ceil(1/2)=1
        assert_eq!(
            fw_count,
            vec![
                PieSlice::new("FW1", 2),
                PieSlice::new("FW2", 1),
                PieSlice::new("FW3", 1)
            ]
        );
        assert_eq!(ic_count, vec![PieSlice::new("ICA", 3), PieSlice::new("ICB", 1)]);
        assert_eq!(fw_owner.get("FW3").map(String::as_str), Some("ICB"));
    }

    #[test]
    fn test_firmware_owner_first_observation_wins() {
        let owners = FirmwareOwners::new();
        owners.record("FW1", "ICA");
        owners.record("FW1", "ICB");
        assert_eq!(owners.owner_of("FW1").as_deref(), Some("ICA"));

        let later = vec![log("9001", 0, &[("FW1", "ICB")])];
        let (ic_count, _, fw_owner) = ic_firmware_counts(&later, &owners);

        assert_eq!(ic_count, vec![PieSlice::new("ICA", 1)]);
        assert_eq!(fw_owner.get("FW1").map(String::as_str), Some("ICA"));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], &FirmwareOwners::new());
        assert_eq!(summary, PortDiagnostics::default());
    }
}
