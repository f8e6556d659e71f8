// Error taxonomy for fetch and aggregation cycles
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Backend answered with a non-2xx status
    #[error("Failed to fetch {endpoint}, status code: {status}, message: {reason}")]
    Http {
        endpoint: String,
        status: u16,
        reason: String,
    },

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body or a field inside it did not have the expected shape
    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    #[error("Lookback of {hours} hours is out of range")]
    InvalidLookback { hours: i64 },

    #[error("Refresh cycle superseded by a newer one")]
    Superseded,
}

impl DashboardError {
    pub fn from_reqwest(endpoint: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            DashboardError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            DashboardError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
