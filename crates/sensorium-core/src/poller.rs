// ── Live polling controller ──
//
// Fetches live readings and device metadata on a fixed interval and
// publishes grouped snapshots through a `watch` channel.
//
// Cycles run as independent tasks so a slow request never delays the next
// tick. Each cycle takes a ticket from a `GenerationGuard`; only the most
// recently scheduled cycle that has finished may publish, and switching
// category invalidates everything still in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::grouping::{DeviceGroup, device_groups};
use crate::model::SensorCategory;
use crate::source::DataSource;

/// Default time between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ── Generation guard ────────────────────────────────────────────────

/// Monotonic ticket counter that decides whether a finished request may
/// still publish.
///
/// A result commits only if its generation is newer than the last committed
/// one and newer than the last invalidation. Late results from superseded
/// requests are therefore dropped.
#[derive(Debug, Default)]
pub struct GenerationGuard {
    issued: AtomicU64,
    committed: AtomicU64,
    floor: AtomicU64,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a new request.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the right to publish for `generation`.
    pub fn try_commit(&self, generation: u64) -> bool {
        if generation <= self.floor.load(Ordering::SeqCst) {
            return false;
        }
        self.committed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (generation > current).then_some(generation)
            })
            .is_ok()
    }

    /// Reject every ticket issued so far.
    pub fn invalidate(&self) {
        let issued = self.issued.load(Ordering::SeqCst);
        self.floor.fetch_max(issued, Ordering::SeqCst);
    }

    /// Whether `generation` is the newest ticket and still valid.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.issued.load(Ordering::SeqCst)
            && generation > self.floor.load(Ordering::SeqCst)
    }
}

// ── Published state ─────────────────────────────────────────────────

/// One complete poll result.
#[derive(Debug, Clone)]
pub struct LiveSnapshot {
    pub category: SensorCategory,
    pub generation: u64,
    pub groups: Vec<DeviceGroup>,
    pub updated_at: DateTime<Local>,
}

impl LiveSnapshot {
    pub fn reading_count(&self) -> usize {
        self.groups.iter().map(|g| g.readings.len()).sum()
    }
}

/// Health of the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// No cycle has finished for the current category yet.
    Loading,
    /// The latest cycle succeeded.
    Live,
    /// The latest cycle failed; the previous snapshot is still shown.
    Stale { error: String },
}

/// What subscribers see: the last good snapshot plus feed health.
#[derive(Debug, Clone)]
pub struct LiveState {
    pub category: SensorCategory,
    pub snapshot: Option<Arc<LiveSnapshot>>,
    pub status: PollStatus,
}

impl LiveState {
    fn loading(category: SensorCategory) -> Self {
        Self {
            category,
            snapshot: None,
            status: PollStatus::Loading,
        }
    }
}

// ── Poller ──────────────────────────────────────────────────────────

struct PollerInner {
    state: watch::Sender<LiveState>,
    category: watch::Sender<SensorCategory>,
    guard: GenerationGuard,
    cancel: CancellationToken,
}

/// Background poller for one sensor category.
///
/// Dropping the poller stops it.
pub struct LivePoller {
    inner: Arc<PollerInner>,
    handle: JoinHandle<()>,
}

impl LivePoller {
    /// Start polling `category` immediately and then every `interval`.
    pub fn spawn<S: DataSource>(source: Arc<S>, category: SensorCategory, interval: Duration) -> Self {
        let (state, _) = watch::channel(LiveState::loading(category));
        let (category_tx, category_rx) = watch::channel(category);
        let inner = Arc::new(PollerInner {
            state,
            category: category_tx,
            guard: GenerationGuard::new(),
            cancel: CancellationToken::new(),
        });

        let period = interval.max(MIN_POLL_INTERVAL);
        info!(%category, interval = ?period, "live poller started");
        let handle = tokio::spawn(poll_task(source, Arc::clone(&inner), period, category_rx));

        Self { inner, handle }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<LiveState> {
        self.inner.state.subscribe()
    }

    /// The latest published state.
    pub fn current(&self) -> LiveState {
        self.inner.state.borrow().clone()
    }

    /// The category being polled.
    pub fn category(&self) -> SensorCategory {
        *self.inner.category.borrow()
    }

    /// Switch to another category. In-flight cycles are discarded, the
    /// snapshot is cleared, and a new cycle starts right away.
    pub fn set_category(&self, category: SensorCategory) {
        if self.category() == category {
            return;
        }
        self.inner.guard.invalidate();
        self.inner
            .state
            .send_replace(LiveState::loading(category));
        let _ = self.inner.category.send(category);
        debug!(%category, "live poller switched category");
    }

    /// Stop polling. Nothing is published afterwards.
    pub fn stop(&self) {
        self.inner.guard.invalidate();
        self.inner.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl Drop for LivePoller {
    fn drop(&mut self) {
        self.stop();
        self.handle.abort();
    }
}

// ── Background tasks ────────────────────────────────────────────────

async fn poll_task<S: DataSource>(
    source: Arc<S>,
    inner: Arc<PollerInner>,
    period: Duration,
    mut category_rx: watch::Receiver<SensorCategory>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut category = *category_rx.borrow_and_update();

    loop {
        tokio::select! {
            biased;
            () = inner.cancel.cancelled() => break,
            changed = category_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                category = *category_rx.borrow_and_update();
                interval.reset_immediately();
            }
            _ = interval.tick() => {
                let generation = inner.guard.issue();
                tokio::spawn(run_cycle(
                    Arc::clone(&source),
                    Arc::clone(&inner),
                    category,
                    generation,
                ));
            }
        }
    }

    debug!("live poller stopped");
}

/// Fetch readings and devices together and publish if still current.
async fn run_cycle<S: DataSource>(
    source: Arc<S>,
    inner: Arc<PollerInner>,
    category: SensorCategory,
    generation: u64,
) {
    let fetch = async { tokio::try_join!(source.live(category), source.live_devices()) };

    let result = tokio::select! {
        biased;
        () = inner.cancel.cancelled() => return,
        result = fetch => result,
    };

    match result {
        Ok((readings, devices)) => {
            let snapshot = LiveSnapshot {
                category,
                generation,
                groups: device_groups(readings, devices),
                updated_at: Local::now(),
            };
            let published = inner.state.send_if_modified(|state| {
                if state.category != category || !inner.guard.try_commit(generation) {
                    return false;
                }
                state.snapshot = Some(Arc::new(snapshot));
                state.status = PollStatus::Live;
                true
            });
            if published {
                debug!(%category, generation, "live snapshot published");
            } else {
                debug!(%category, generation, "discarding superseded poll result");
            }
        }
        Err(e) => {
            warn!(error = %e, %category, generation, "live poll failed");
            inner.state.send_if_modified(|state| {
                if state.category != category || !inner.guard.try_commit(generation) {
                    return false;
                }
                state.status = PollStatus::Stale {
                    error: e.to_string(),
                };
                true
            });
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::error::CoreError;
    use crate::model::{Device, ReportPeriod, ReportRow, SensorDescriptor, SensorReading};

    type Scripted = (Duration, Result<Vec<SensorReading>, String>);

    /// Replays scripted `live` responses in order; `live_devices` is instant.
    #[derive(Default)]
    struct ScriptedSource {
        script: Mutex<VecDeque<Scripted>>,
        live_calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                live_calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.live_calls.load(Ordering::SeqCst)
        }
    }

    impl DataSource for ScriptedSource {
        async fn devices(&self) -> Result<Vec<Device>, CoreError> {
            Ok(Vec::new())
        }

        async fn sensors(&self, _device_id: &str) -> Result<Vec<SensorDescriptor>, CoreError> {
            Ok(Vec::new())
        }

        async fn live(&self, _category: SensorCategory) -> Result<Vec<SensorReading>, CoreError> {
            self.live_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            let (delay, result) = next.unwrap_or((Duration::ZERO, Ok(Vec::new())));
            tokio::time::sleep(delay).await;
            result.map_err(CoreError::Internal)
        }

        async fn live_devices(&self) -> Result<Vec<Device>, CoreError> {
            Ok(vec![Device {
                name: Some("Rack".into()),
                ..Device::placeholder("A")
            }])
        }

        async fn report(
            &self,
            _device_id: &str,
            _sensor_id: &str,
            _period: ReportPeriod,
        ) -> Result<Vec<ReportRow>, CoreError> {
            Ok(Vec::new())
        }
    }

    fn readings(sensor: &str) -> Vec<SensorReading> {
        vec![SensorReading {
            sensor_id: sensor.into(),
            device_id: "A".into(),
            ..SensorReading::default()
        }]
    }

    fn first_sensor(state: &LiveState) -> String {
        state.snapshot.as_ref().unwrap().groups[0].readings[0]
            .sensor_id
            .clone()
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[test]
    fn guard_rejects_older_generations() {
        let guard = GenerationGuard::new();
        let first = guard.issue();
        let second = guard.issue();
        assert!(guard.is_current(second));
        assert!(!guard.is_current(first));

        assert!(guard.try_commit(second));
        assert!(!guard.try_commit(first));
        assert!(!guard.try_commit(second));
    }

    #[test]
    fn guard_invalidate_rejects_everything_in_flight() {
        let guard = GenerationGuard::new();
        let pending = guard.issue();
        guard.invalidate();
        assert!(!guard.is_current(pending));
        assert!(!guard.try_commit(pending));

        let fresh = guard.issue();
        assert!(guard.try_commit(fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn first_cycle_runs_immediately_and_groups_readings() {
        let source = ScriptedSource::new(vec![(Duration::ZERO, Ok(readings("1")))]);
        let poller = LivePoller::spawn(Arc::clone(&source), SensorCategory::Digital, DEFAULT_POLL_INTERVAL);
        let mut rx = poller.subscribe();

        rx.changed().await.unwrap();
        let state = rx.borrow().clone();
        assert_eq!(state.status, PollStatus::Live);
        let snapshot = state.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.category, SensorCategory::Digital);
        assert_eq!(snapshot.groups[0].device.display_name(), "Rack");
        assert_eq!(snapshot.reading_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_older_cycle_is_discarded() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Ok(readings("first"))),
            (Duration::from_secs(8), Ok(readings("slow"))),
            (Duration::ZERO, Ok(readings("third"))),
            (Duration::from_secs(60), Ok(readings("late"))),
        ]);
        let poller = LivePoller::spawn(Arc::clone(&source), SensorCategory::Digital, DEFAULT_POLL_INTERVAL);

        // t=0 first, t=5 slow starts, t=10 third, t=13 slow finishes.
        advance(14).await;

        let state = poller.current();
        assert_eq!(first_sensor(&state), "third");
        assert_eq!(state.snapshot.as_ref().unwrap().generation, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycle_keeps_last_snapshot() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Ok(readings("good"))),
            (Duration::ZERO, Err("boom".into())),
            (Duration::from_secs(60), Ok(Vec::new())),
        ]);
        let poller = LivePoller::spawn(Arc::clone(&source), SensorCategory::Power, DEFAULT_POLL_INTERVAL);

        advance(6).await;

        let state = poller.current();
        assert_eq!(first_sensor(&state), "good");
        match state.status {
            PollStatus::Stale { error } => assert!(error.contains("boom")),
            other => panic!("expected stale status, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn category_switch_drops_in_flight_cycles() {
        let source = ScriptedSource::new(vec![
            (Duration::from_secs(3), Ok(readings("digital"))),
            (Duration::ZERO, Ok(readings("power"))),
            (Duration::from_secs(60), Ok(Vec::new())),
        ]);
        let poller = LivePoller::spawn(Arc::clone(&source), SensorCategory::Digital, DEFAULT_POLL_INTERVAL);

        advance(1).await;
        poller.set_category(SensorCategory::Power);
        advance(3).await;

        let state = poller.current();
        assert_eq!(state.category, SensorCategory::Power);
        assert_eq!(first_sensor(&state), "power");
        assert_eq!(poller.category(), SensorCategory::Power);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_polling() {
        let source = ScriptedSource::new(Vec::new());
        let poller = LivePoller::spawn(Arc::clone(&source), SensorCategory::Switch, DEFAULT_POLL_INTERVAL);

        advance(1).await;
        let calls = source.calls();
        assert_eq!(calls, 1);

        poller.stop();
        advance(30).await;
        assert_eq!(source.calls(), calls);
        assert!(poller.is_stopped());
    }
}
