// Chart panel state: last good data, loading flag and refresh cycles
use crate::domain::time_range::{PendingRange, TimeRange};
use crate::error::{DashboardError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot<T> {
    pub data: T,
    pub loading: bool,
    pub last_error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Identifies one refresh cycle; stale once a newer cycle has started.
#[derive(Debug, Clone)]
pub struct CycleToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl CycleToken {
    /// A token that is always current, for callers outside any panel.
    #[cfg(test)]
    pub fn detached() -> Self {
        Self {
            generation: 0,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshOutcome {
    Applied,
    /// Range endpoint unset or zero-width; nothing fetched
    NotReady,
    /// Load failed; previous data kept
    Failed,
    /// A newer cycle started before this one finished; result dropped
    Superseded,
}

struct PanelState<T> {
    data: T,
    last_error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Marks one cycle as loading for as long as it is alive. Dropping it
/// clears the flag unless a newer cycle has taken it over, so a cancelled
/// cycle never leaves the panel loading.
struct LoadingCycle<'a> {
    slot: &'a AtomicU64,
    generation: u64,
}

impl<'a> LoadingCycle<'a> {
    fn start(slot: &'a AtomicU64, generation: u64) -> Self {
        slot.fetch_max(generation, Ordering::SeqCst);
        Self { slot, generation }
    }
}

impl Drop for LoadingCycle<'_> {
    fn drop(&mut self) {
        let _ = self
            .slot
            .compare_exchange(self.generation, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

pub struct ChartPanel<T> {
    name: &'static str,
    state: RwLock<PanelState<T>>,
    latest: Arc<AtomicU64>,
    /// Generation of the cycle currently loading, 0 when idle
    loading: AtomicU64,
}

impl<T: Clone> ChartPanel<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            state: RwLock::new(PanelState {
                data: initial,
                last_error: None,
                refreshed_at: None,
            }),
            latest: Arc::new(AtomicU64::new(0)),
            loading: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> PanelSnapshot<T> {
        let state = self.state.read().await;
        PanelSnapshot {
            data: state.data.clone(),
            loading: self.loading.load(Ordering::SeqCst) != 0,
            last_error: state.last_error.clone(),
            refreshed_at: state.refreshed_at,
        }
    }

    /// Run one fetch-aggregate cycle for `pending`.
    ///
    /// Only the most recently started cycle may replace the panel data. On
    /// failure the previous data stays in place and the error text is kept
    /// for display. An inverted range is rejected before anything is fetched.
    /// Dropping the returned future mid-cycle leaves the data untouched and
    /// clears the loading flag.
    pub async fn refresh<F, Fut>(&self, pending: PendingRange, load: F) -> Result<RefreshOutcome>
    where
        F: FnOnce(TimeRange, CycleToken) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(range) = pending.ready()? else {
            tracing::debug!("{}: range not ready, skipping refresh", self.name);
            return Ok(RefreshOutcome::NotReady);
        };

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CycleToken {
            generation,
            latest: self.latest.clone(),
        };
        let _loading = LoadingCycle::start(&self.loading, generation);

        let result = load(range, token.clone()).await;

        let mut state = self.state.write().await;
        if !token.is_current() {
            tracing::warn!("{}: dropping result of superseded cycle {}", self.name, generation);
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(data) => {
                state.data = data;
                state.last_error = None;
                state.refreshed_at = Some(Utc::now());
                tracing::info!("{}: refreshed {} .. {}", self.name, range.start_at, range.end_at);
                Ok(RefreshOutcome::Applied)
            }
            Err(DashboardError::Superseded) => Ok(RefreshOutcome::Superseded),
            Err(e) => {
                tracing::error!("{}: refresh failed, keeping previous data: {}", self.name, e);
                state.last_error = Some(e.to_string());
                Ok(RefreshOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_range::ts;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn pending(start: &str, end: &str) -> PendingRange {
        PendingRange::from(TimeRange::new(ts(start), ts(end)))
    }

    #[tokio::test]
    async fn test_refresh_applies_data() {
        let panel = ChartPanel::new("test", 0u32);

        let outcome = panel
            .refresh(pending("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"), |_, _| async {
                Ok(7)
            })
            .await
            .unwrap();

        let snapshot = panel.snapshot().await;
        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(snapshot.data, 7);
        assert!(!snapshot.loading);
        assert!(snapshot.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let panel = ChartPanel::new("test", vec![1u32, 2, 3]);
        let before = panel.snapshot().await.data;

        let outcome = panel
            .refresh(pending("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"), |_, _| async {
                Err(DashboardError::Timeout {
                    endpoint: "mp_logs".to_string(),
                })
            })
            .await
            .unwrap();

        let snapshot = panel.snapshot().await;
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(snapshot.data, before);
        assert!(!snapshot.loading);
        assert!(snapshot.last_error.unwrap().contains("mp_logs"));
    }

    #[tokio::test]
    async fn test_unset_or_zero_width_range_is_a_no_op() {
        let panel = ChartPanel::new("test", 0u32);

        let unset = PendingRange {
            start_at: None,
            end_at: Some(ts("2024-01-01T00:00:00Z")),
        };
        let outcome = panel.refresh(unset, |_, _| async { Ok(99) }).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotReady);

        let zero = pending("2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z");
        let outcome = panel.refresh(zero, |_, _| async { Ok(99) }).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NotReady);

        let snapshot = panel.snapshot().await;
        assert_eq!(snapshot.data, 0);
        assert!(snapshot.refreshed_at.is_none());
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let panel = ChartPanel::new("test", 0u32);
        let inverted = PendingRange {
            start_at: Some(ts("2024-01-02T00:00:00Z")),
            end_at: Some(ts("2024-01-01T00:00:00Z")),
        };

        let result = panel.refresh(inverted, |_, _| async { Ok(1) }).await;

        assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
        assert_eq!(panel.snapshot().await.data, 0);
    }

    #[tokio::test]
    async fn test_late_stale_cycle_is_dropped() {
        let panel = Arc::new(ChartPanel::new("test", 0u32));
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let (started_tx, started_rx) = oneshot::channel::<()>();

        let slow_panel = panel.clone();
        let slow = tokio::spawn(async move {
            slow_panel
                .refresh(pending("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"), |_, token| async move {
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    assert!(!token.is_current());
                    Ok(1)
                })
                .await
        });

        started_rx.await.unwrap();
        let fast = panel
            .refresh(pending("2024-01-03T00:00:00Z", "2024-01-04T00:00:00Z"), |_, _| async {
                Ok(2)
            })
            .await
            .unwrap();
        release_tx.send(()).unwrap();
        let slow = slow.await.unwrap().unwrap();

        assert_eq!(fast, RefreshOutcome::Applied);
        assert_eq!(slow, RefreshOutcome::Superseded);
        assert_eq!(panel.snapshot().await.data, 2);
    }

    #[tokio::test]
    async fn test_cancelled_cycle_clears_loading() {
        let panel = ChartPanel::new("test", 5u32);

        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            panel.refresh(pending("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"), |_, _| {
                std::future::pending::<Result<u32>>()
            }),
        )
        .await;

        assert!(cancelled.is_err());
        let snapshot = panel.snapshot().await;
        assert!(!snapshot.loading);
        assert_eq!(snapshot.data, 5);
    }

    #[tokio::test]
    async fn test_cancelled_stale_cycle_keeps_newer_cycle_loading() {
        let panel = Arc::new(ChartPanel::new("test", 0u32));
        let (old_started_tx, old_started_rx) = oneshot::channel::<()>();
        let (new_started_tx, new_started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let old_panel = panel.clone();
        let old = tokio::spawn(async move {
            old_panel
                .refresh(pending("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"), |_, _| async move {
                    let _ = old_started_tx.send(());
                    std::future::pending::<Result<u32>>().await
                })
                .await
        });
        old_started_rx.await.unwrap();

        let new_panel = panel.clone();
        let new = tokio::spawn(async move {
            new_panel
                .refresh(pending("2024-01-03T00:00:00Z", "2024-01-04T00:00:00Z"), |_, _| async move {
                    let _ = new_started_tx.send(());
                    let _ = release_rx.await;
                    Ok(3)
                })
                .await
        });
        new_started_rx.await.unwrap();

        old.abort();
        assert!(old.await.unwrap_err().is_cancelled());
        assert!(panel.snapshot().await.loading);

        release_tx.send(()).unwrap();
        assert_eq!(new.await.unwrap().unwrap(), RefreshOutcome::Applied);
        let snapshot = panel.snapshot().await;
        assert!(!snapshot.loading);
        assert_eq!(snapshot.data, 3);
    }

    #[test]
    fn test_detached_token_is_current() {
        assert!(CycleToken::detached().is_current());
    }
}
