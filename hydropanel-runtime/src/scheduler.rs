use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use telemetry::{HistoryBatch, StatusSnapshot, TelemetryError, TelemetrySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
    Paused,
}

/// Result of one settled poll cycle: both fetches succeeded, or the cycle as
/// a whole failed. Never a partial success.
#[derive(Debug)]
pub enum CycleOutcome {
    Update {
        status: StatusSnapshot,
        history: HistoryBatch,
    },
    Failed(TelemetryError),
}

/// Fixed-interval poll driver.
///
/// Each cycle fetches status and history concurrently on a worker thread and
/// settles both before reporting one `CycleOutcome`. The next cycle is only
/// scheduled after the current one settles, so there is at most one in-flight
/// cycle no matter how slow the network is.
pub struct PollScheduler {
    source: Arc<dyn TelemetrySource>,
    state: SchedulerState,
    interval: Duration,
    next_due: Option<Instant>,
    in_flight: Option<Receiver<CycleOutcome>>,
}

impl PollScheduler {
    pub fn new(source: Arc<dyn TelemetrySource>) -> Self {
        Self {
            source,
            state: SchedulerState::Stopped,
            interval: Duration::ZERO,
            next_due: None,
            in_flight: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Begin cycling, with an immediate first cycle. Restarting while running
    /// resets the cadence but never overlaps a cycle already in flight.
    pub fn start(&mut self, interval: Duration) {
        self.state = SchedulerState::Running;
        self.interval = interval;
        self.next_due = Some(Instant::now());
    }

    /// Cancel the pending cycle and stop scheduling. Idempotent; an in-flight
    /// worker's result is discarded.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
        self.next_due = None;
        self.in_flight = None;
    }

    /// Stop starting new cycles. A cycle already in flight is allowed to
    /// finish and its outcome is still delivered by `poll`.
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
        }
    }

    /// Resume cycling: fires immediately (no stale wait) and then keeps the
    /// configured cadence.
    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
            self.next_due = Some(Instant::now());
        }
    }

    /// Drive the scheduler. Harvests a settled cycle if one is ready and
    /// spawns the next cycle when due. Returns the settled outcome, if any.
    pub fn poll(&mut self, now: Instant) -> Option<CycleOutcome> {
        if let Some(rx) = &self.in_flight {
            return match rx.try_recv() {
                Ok(outcome) => {
                    self.settle(now);
                    Some(outcome)
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.settle(now);
                    Some(CycleOutcome::Failed(TelemetryError::Transport(
                        "poll cycle worker died".to_string(),
                    )))
                }
            };
        }

        if self.state == SchedulerState::Running {
            if let Some(due) = self.next_due {
                if now >= due {
                    self.in_flight = Some(spawn_cycle(Arc::clone(&self.source)));
                }
            }
        }
        None
    }

    fn settle(&mut self, now: Instant) {
        self.in_flight = None;
        if self.state == SchedulerState::Running {
            self.next_due = Some(now + self.interval);
        } else {
            self.next_due = None;
        }
    }
}

/// Run one cycle on a worker thread: status and history fetched concurrently,
/// both settled before the combined outcome is sent.
fn spawn_cycle(source: Arc<dyn TelemetrySource>) -> Receiver<CycleOutcome> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let status_source = Arc::clone(&source);
        let status_task = thread::spawn(move || status_source.fetch_status());
        let history = source.fetch_history();
        let status = status_task
            .join()
            .unwrap_or_else(|_| Err(TelemetryError::Transport("status fetch panicked".to_string())));
        let outcome = match (status, history) {
            (Ok(status), Ok(history)) => CycleOutcome::Update { status, history },
            (Err(err), _) | (_, Err(err)) => CycleOutcome::Failed(err),
        };
        // The receiver may be gone if the scheduler was stopped mid-cycle.
        let _ = tx.send(outcome);
    });
    rx
}
