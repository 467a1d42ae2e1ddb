//! Data bridge: connects the [`Dashboard`] to TUI actions.
//!
//! The live poller publishes through a watch channel; a bridge task forwards
//! every change as an [`Action`]. One-shot loads (overview, device list,
//! sensors, reports) run as short tasks that send their result back.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sensorium_core::{Dashboard, GenerationGuard, LiveState, ReportPeriod};

use crate::action::{Action, ReportData};

/// Forward every published [`LiveState`] until cancelled or the poller stops.
pub async fn spawn_live_bridge(
    mut rx: watch::Receiver<LiveState>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    // Whatever the poller already holds goes out first.
    let initial = rx.borrow_and_update().clone();
    if action_tx.send(Action::LiveUpdated(initial)).is_err() {
        return;
    }

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("live poller closed");
                    break;
                }
                let state = rx.borrow_and_update().clone();
                if action_tx.send(Action::LiveUpdated(state)).is_err() {
                    break;
                }
            }
        }
    }
}

pub fn load_overview(dashboard: Dashboard, action_tx: mpsc::UnboundedSender<Action>) {
    tokio::spawn(async move {
        let action = match dashboard.overview().await {
            Ok(summary) => Action::OverviewLoaded(summary),
            Err(e) => {
                warn!(error = %e, "overview load failed");
                Action::OverviewFailed(e.summary())
            }
        };
        let _ = action_tx.send(action);
    });
}

pub fn load_devices(dashboard: Dashboard, action_tx: mpsc::UnboundedSender<Action>) {
    tokio::spawn(async move {
        let action = match dashboard.devices().await {
            Ok(devices) => Action::DevicesLoaded(devices),
            Err(e) => {
                warn!(error = %e, "device list load failed");
                Action::DevicesFailed(e.summary())
            }
        };
        let _ = action_tx.send(action);
    });
}

pub fn load_sensors(
    dashboard: Dashboard,
    device_id: String,
    action_tx: mpsc::UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        let action = match dashboard.sensors(&device_id).await {
            Ok(sensors) => Action::SensorsLoaded { device_id, sensors },
            Err(e) => {
                warn!(error = %e, device_id, "sensor list load failed");
                Action::ReportFailed(e.summary())
            }
        };
        let _ = action_tx.send(action);
    });
}

/// What a report fetch is for.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub device_id: String,
    pub sensor_id: String,
    pub period: ReportPeriod,
}

/// Fetch a report under a fresh ticket from `guard`.
///
/// Results from a request that was superseded while in flight are dropped
/// here; the app re-checks with `try_commit` before showing them.
pub fn load_report(
    dashboard: Dashboard,
    request: ReportRequest,
    guard: Arc<GenerationGuard>,
    action_tx: mpsc::UnboundedSender<Action>,
) {
    let generation = guard.issue();
    debug!(generation, ?request, "report requested");

    tokio::spawn(async move {
        let result = dashboard
            .report(&request.device_id, &request.sensor_id, request.period)
            .await;

        if !guard.is_current(generation) {
            debug!(generation, "dropping superseded report");
            return;
        }

        let action = match result {
            Ok(rows) => Action::ReportLoaded(ReportData {
                generation,
                device_id: request.device_id,
                sensor_id: request.sensor_id,
                period: request.period,
                rows: Arc::new(rows),
            }),
            Err(e) => {
                warn!(error = %e, generation, "report load failed");
                Action::ReportFailed(e.summary())
            }
        };
        let _ = action_tx.send(action);
    });
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use sensorium_core::{PollStatus, SensorCategory};

    use super::*;

    fn state(status: PollStatus) -> LiveState {
        LiveState {
            category: SensorCategory::Digital,
            snapshot: None,
            status,
        }
    }

    #[tokio::test]
    async fn bridge_forwards_initial_and_changed_state() {
        let (state_tx, state_rx) = watch::channel(state(PollStatus::Loading));
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(spawn_live_bridge(state_rx, action_tx, cancel.clone()));

        let first = action_rx.recv().await.unwrap();
        assert!(matches!(
            first,
            Action::LiveUpdated(LiveState { status: PollStatus::Loading, .. })
        ));

        state_tx.send(state(PollStatus::Live)).unwrap();
        let second = action_rx.recv().await.unwrap();
        assert!(matches!(
            second,
            Action::LiveUpdated(LiveState { status: PollStatus::Live, .. })
        ));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn bridge_stops_when_poller_goes_away() {
        let (state_tx, state_rx) = watch::channel(state(PollStatus::Loading));
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(spawn_live_bridge(
            state_rx,
            action_tx,
            CancellationToken::new(),
        ));
        let _ = action_rx.recv().await.unwrap();
        drop(state_tx);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
