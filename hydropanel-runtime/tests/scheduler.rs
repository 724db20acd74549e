use hydropanel_runtime::{CycleOutcome, PollScheduler, SchedulerState};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use telemetry::{
    ControllerConfig, ControllerMode, HealthReport, HistoryBatch, Measurement, StatusSnapshot,
    TelemetryError, TelemetrySource, WriteAck,
};

/// Source with a configurable per-fetch delay, tracking how many status
/// fetches ever run at the same time.
struct SlowSource {
    delay: Duration,
    fail_status: AtomicBool,
    status_calls: AtomicUsize,
    history_calls: AtomicUsize,
    active_status: AtomicUsize,
    max_active_status: AtomicUsize,
}

impl SlowSource {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_status: AtomicBool::new(false),
            status_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            active_status: AtomicUsize::new(0),
            max_active_status: AtomicUsize::new(0),
        }
    }
}

impl TelemetrySource for SlowSource {
    fn fetch_status(&self) -> Result<StatusSnapshot, TelemetryError> {
        let active = self.active_status.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_status.fetch_max(active, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.active_status.fetch_sub(1, Ordering::SeqCst);
        if self.fail_status.load(Ordering::SeqCst) {
            Err(TelemetryError::Transport("connection refused".to_string()))
        } else {
            Ok(StatusSnapshot {
                mode: ControllerMode::Automatic,
                latest_level: Some(18.0),
                valve_opening: 25,
                last_update: Some(1_700_000_000),
            })
        }
    }

    fn fetch_history(&self) -> Result<HistoryBatch, TelemetryError> {
        thread::sleep(self.delay);
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(HistoryBatch {
            measurements: vec![Measurement {
                timestamp: Some(1000),
                level: 12.3,
            }],
            count: 1,
        })
    }

    fn fetch_config(&self) -> Result<ControllerConfig, TelemetryError> {
        Err(TelemetryError::Transport("not scripted".to_string()))
    }

    fn health(&self) -> Result<HealthReport, TelemetryError> {
        Err(TelemetryError::Transport("not scripted".to_string()))
    }

    fn set_mode(&self, _mode: ControllerMode) -> Result<WriteAck, TelemetryError> {
        Err(TelemetryError::Transport("not scripted".to_string()))
    }

    fn set_valve(&self, _opening: u8) -> Result<WriteAck, TelemetryError> {
        Err(TelemetryError::Transport("not scripted".to_string()))
    }
}

/// Drive `poll` until an outcome settles or the timeout passes.
fn pump(scheduler: &mut PollScheduler, timeout: Duration) -> Option<CycleOutcome> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(outcome) = scheduler.poll(Instant::now()) {
            return Some(outcome);
        }
        thread::sleep(Duration::from_millis(1));
    }
    None
}

#[test]
fn first_cycle_fires_immediately_and_settles_both_fetches() {
    let source = Arc::new(SlowSource::new(Duration::ZERO));
    let mut scheduler = PollScheduler::new(source.clone());
    // A long interval proves the first cycle does not wait for it.
    scheduler.start(Duration::from_secs(60));

    match pump(&mut scheduler, Duration::from_secs(2)) {
        Some(CycleOutcome::Update { status, history }) => {
            assert_eq!(status.valve_opening, 25);
            assert_eq!(history.measurements.len(), 1);
        }
        other => panic!("expected update outcome, got {other:?}"),
    }
    assert_eq!(source.status_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cycles_never_overlap_under_a_slow_source() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(30)));
    let mut scheduler = PollScheduler::new(source.clone());
    scheduler.start(Duration::from_millis(1));

    for _ in 0..3 {
        assert!(pump(&mut scheduler, Duration::from_secs(2)).is_some());
    }
    assert_eq!(source.max_active_status.load(Ordering::SeqCst), 1);
}

#[test]
fn fetch_failure_reports_one_combined_failure() {
    let source = Arc::new(SlowSource::new(Duration::ZERO));
    source.fail_status.store(true, Ordering::SeqCst);
    let mut scheduler = PollScheduler::new(source.clone());
    scheduler.start(Duration::from_secs(60));

    match pump(&mut scheduler, Duration::from_secs(2)) {
        Some(CycleOutcome::Failed(_)) => {}
        other => panic!("expected failed outcome, got {other:?}"),
    }
    // The failing status fetch did not abort the history fetch.
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_cancels_the_pending_cycle_and_is_idempotent() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(50)));
    let mut scheduler = PollScheduler::new(source.clone());
    scheduler.start(Duration::from_millis(1));

    scheduler.poll(Instant::now());
    assert!(scheduler.is_in_flight());

    scheduler.stop();
    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert!(!scheduler.is_in_flight());
    assert!(pump(&mut scheduler, Duration::from_millis(200)).is_none());
}

#[test]
fn pause_lets_the_in_flight_cycle_settle_then_idles() {
    let source = Arc::new(SlowSource::new(Duration::from_millis(30)));
    let mut scheduler = PollScheduler::new(source.clone());
    scheduler.start(Duration::from_millis(1));

    scheduler.poll(Instant::now());
    assert!(scheduler.is_in_flight());
    scheduler.pause();

    assert!(pump(&mut scheduler, Duration::from_secs(2)).is_some());
    assert!(pump(&mut scheduler, Duration::from_millis(200)).is_none());
    assert_eq!(source.status_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn resume_fires_immediately_instead_of_waiting_out_the_interval() {
    let source = Arc::new(SlowSource::new(Duration::ZERO));
    let mut scheduler = PollScheduler::new(source.clone());
    scheduler.start(Duration::from_secs(60));

    assert!(pump(&mut scheduler, Duration::from_secs(2)).is_some());
    scheduler.pause();
    assert_eq!(scheduler.state(), SchedulerState::Paused);

    scheduler.resume();
    assert!(pump(&mut scheduler, Duration::from_secs(2)).is_some());
    assert_eq!(source.status_calls.load(Ordering::SeqCst), 2);
}
