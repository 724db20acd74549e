use crate::scheduler::{CycleOutcome, PollScheduler};
use hydropanel_core::{
    Controls, LevelBand, LinkEvent, LinkMonitor, LinkState, Notification, NotificationCenter,
    PanelConfig, SeriesWindow, Thresholds,
};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use telemetry::{ControllerMode, StatusSnapshot, TelemetrySource};

const LOOP_TICK: Duration = Duration::from_millis(10);

/// User gestures and lifecycle requests, funneled into the panel thread.
/// Nothing else may mutate panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    SwitchMode(ControllerMode),
    SliderGrab,
    SliderDrag(u8),
    SliderRelease,
    ApplyValve,
    Pause,
    Resume,
    Shutdown,
}

/// What the presentation adapter subscribes to. Chart, badges and toasts are
/// rendered from these alone; the adapter never reads panel state directly.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    LinkChanged(LinkState),
    StatusUpdated {
        mode: ControllerMode,
        manual_enabled: bool,
        valve_reading: u8,
        slider_value: u8,
        latest_level: Option<f64>,
        band: Option<LevelBand>,
        last_update: Option<i64>,
    },
    SeriesRefreshed {
        points: Vec<(String, f64)>,
        count: usize,
    },
    Toast(Notification),
}

struct Panel {
    source: Arc<dyn TelemetrySource>,
    scheduler: PollScheduler,
    link: LinkMonitor,
    window: SeriesWindow,
    controls: Controls,
    center: NotificationCenter,
    thresholds: Thresholds,
    latest_level: Option<f64>,
    last_update: Option<i64>,
    shown_link: LinkState,
    events: Sender<PanelEvent>,
}

impl Panel {
    fn new(source: Arc<dyn TelemetrySource>, config: &PanelConfig, events: Sender<PanelEvent>) -> Self {
        // Thresholds come from the controller once at startup; falling back
        // to the configured defaults is silent beyond this log line.
        let thresholds = match source.fetch_config() {
            Ok(remote) => Thresholds::from(&remote),
            Err(err) => {
                log::warn!("threshold config unavailable, using defaults: {err}");
                Thresholds::new(config.l1_threshold, config.l2_threshold)
            }
        };
        let scheduler = PollScheduler::new(Arc::clone(&source));
        Self {
            source,
            scheduler,
            link: LinkMonitor::new(),
            window: SeriesWindow::new(config.chart_max_points),
            controls: Controls::new(),
            center: NotificationCenter::new(Duration::from_millis(config.toast_duration_ms)),
            thresholds,
            latest_level: None,
            last_update: None,
            shown_link: LinkState::Disconnected,
            events,
        }
    }

    fn toast(&mut self, notification: Notification) {
        self.center.show(notification.clone());
        let _ = self.events.send(PanelEvent::Toast(notification));
    }

    fn publish_link(&mut self) {
        let state = self.link.state();
        if state != self.shown_link {
            self.shown_link = state;
            let _ = self.events.send(PanelEvent::LinkChanged(state));
        }
    }

    fn publish_status(&mut self) {
        let _ = self.events.send(PanelEvent::StatusUpdated {
            mode: self.controls.mode(),
            manual_enabled: self.controls.manual_enabled(),
            valve_reading: self.controls.valve_reading(),
            slider_value: self.controls.slider_value(),
            latest_level: self.latest_level,
            band: self.latest_level.map(|level| self.thresholds.classify(level)),
            last_update: self.last_update,
        });
    }

    fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) {
        self.controls.apply_snapshot(snapshot);
        self.latest_level = snapshot.latest_level;
        self.last_update = snapshot.last_update;
    }

    fn apply_outcome(&mut self, outcome: CycleOutcome) {
        match outcome {
            CycleOutcome::Update { status, history } => {
                if let Some(LinkEvent::Reconnected) = self.link.record_success() {
                    self.toast(Notification::success("Connected to controller"));
                }
                // Status and history land together: dependents never see one
                // tick's status without that tick's history.
                self.apply_snapshot(&status);
                self.publish_status();
                if self.window.absorb(&history.measurements) {
                    let points: Vec<_> = self.window.points().collect();
                    let count = points.len();
                    let _ = self.events.send(PanelEvent::SeriesRefreshed { points, count });
                }
            }
            CycleOutcome::Failed(err) => {
                log::debug!("poll cycle failed: {err}");
                if let Some(LinkEvent::ConnectionLost) = self.link.record_failure() {
                    self.toast(Notification::error("Lost connection to controller"));
                }
            }
        }
        self.publish_link();
    }

    /// Returns false when the panel should shut down.
    fn handle_command(&mut self, command: PanelCommand) -> bool {
        match command {
            PanelCommand::SwitchMode(mode) => {
                let toast = self.controls.switch_mode(self.source.as_ref(), mode);
                self.toast(toast);
                self.publish_status();
            }
            PanelCommand::SliderGrab => self.controls.begin_drag(),
            PanelCommand::SliderDrag(value) => {
                self.controls.drag(value);
                self.publish_status();
            }
            PanelCommand::SliderRelease => self.controls.end_drag(),
            PanelCommand::ApplyValve => {
                let toast = self.controls.apply_valve(self.source.as_ref());
                self.toast(toast);
                self.publish_status();
            }
            PanelCommand::Pause => self.scheduler.pause(),
            PanelCommand::Resume => self.scheduler.resume(),
            PanelCommand::Shutdown => return false,
        }
        true
    }

    fn tick(&mut self) {
        let now = Instant::now();
        if let Some(outcome) = self.scheduler.poll(now) {
            self.apply_outcome(outcome);
        }
        if self.scheduler.is_in_flight() {
            self.link.poll_started();
        }
        self.publish_link();
        self.center.sweep_expired();
    }
}

/// Spawn the panel thread: it owns all live state, consumes commands, and
/// publishes events until `Shutdown` arrives or the command sender is
/// dropped.
pub fn spawn_panel(
    source: Arc<dyn TelemetrySource>,
    config: PanelConfig,
) -> (Sender<PanelCommand>, Receiver<PanelEvent>) {
    let (command_tx, command_rx) = mpsc::channel::<PanelCommand>();
    let (event_tx, event_rx) = mpsc::channel::<PanelEvent>();
    let interval = Duration::from_millis(config.poll_interval_ms);

    thread::spawn(move || {
        let mut panel = Panel::new(source, &config, event_tx);
        panel.scheduler.start(interval);
        panel.publish_status();

        'main: loop {
            loop {
                match command_rx.try_recv() {
                    Ok(command) => {
                        if !panel.handle_command(command) {
                            break 'main;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break 'main,
                }
            }
            panel.tick();
            thread::sleep(LOOP_TICK);
        }
        panel.scheduler.stop();
    });

    (command_tx, event_rx)
}
