use crate::notify::Notification;
use telemetry::{ControllerMode, StatusSnapshot, TelemetrySource};

const WRITE_FAILED: &str = "Failed to communicate with the controller";

/// Canonical mode and valve display state, mediating between user-initiated
/// writes and server-confirmed reads.
///
/// The displayed values reflect the latest confirmed server state except
/// while the operator is interacting: between `begin_drag` and `end_drag`
/// the slider belongs to the operator, and in MANUAL mode it keeps the last
/// user-applied value rather than chasing server feedback.
pub struct Controls {
    mode: ControllerMode,
    slider_value: u8,
    slider_engaged: bool,
    valve_reading: u8,
    last_applied: Option<u8>,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            mode: ControllerMode::Automatic,
            slider_value: 0,
            slider_engaged: false,
            valve_reading: 0,
            last_applied: None,
        }
    }

    pub fn mode(&self) -> ControllerMode {
        self.mode
    }

    /// Whether the slider and apply action are enabled.
    pub fn manual_enabled(&self) -> bool {
        self.mode.is_manual()
    }

    pub fn slider_value(&self) -> u8 {
        self.slider_value
    }

    /// Server-reported opening, shown in the valve readout.
    pub fn valve_reading(&self) -> u8 {
        self.valve_reading
    }

    pub fn is_engaged(&self) -> bool {
        self.slider_engaged
    }

    pub fn last_applied(&self) -> Option<u8> {
        self.last_applied
    }

    /// Force the displayed mode without going through the write path. Used
    /// for server-reported mode (e.g. a hardware-side override) so display
    /// and enablement converge on the next poll.
    pub fn set_mode(&mut self, mode: ControllerMode) {
        self.mode = mode;
    }

    /// Gesture start. While engaged, incoming snapshots leave the slider
    /// alone.
    pub fn begin_drag(&mut self) {
        self.slider_engaged = true;
    }

    /// Live slider movement. Valid outside an engagement too (keyboard
    /// adjustment), clamped to 0-100.
    pub fn drag(&mut self, value: u8) {
        self.slider_value = value.min(100);
    }

    /// Gesture end. Fired on global release as well, so it must be
    /// idempotent even when the pointer leaves the control first.
    pub fn end_drag(&mut self) {
        self.slider_engaged = false;
    }

    /// Fold one confirmed status snapshot into the display state.
    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) {
        self.set_mode(snapshot.mode);
        self.valve_reading = snapshot.valve_opening;
        if !self.slider_engaged && !self.mode.is_manual() {
            self.slider_value = snapshot.valve_opening.min(100);
        }
    }

    /// Request a mode switch. The display changes only after the controller
    /// confirms; a failed or rejected write leaves the prior mode in place.
    /// No retry: the next user action is the retry.
    pub fn switch_mode(
        &mut self,
        source: &dyn TelemetrySource,
        mode: ControllerMode,
    ) -> Notification {
        if mode == ControllerMode::Unconnected {
            return Notification::error("UNCONNECTED cannot be requested");
        }
        match source.set_mode(mode) {
            Ok(ack) if ack.success => {
                self.set_mode(mode);
                Notification::success(format!("Switched to {mode} mode"))
            }
            Ok(ack) => Notification::error(
                ack.message
                    .unwrap_or_else(|| "Failed to switch mode".to_string()),
            ),
            Err(err) => {
                log::warn!("mode write failed: {err}");
                Notification::error(WRITE_FAILED)
            }
        }
    }

    /// Write the current slider value to the valve. Refused locally, with no
    /// network call, unless the displayed mode is MANUAL. The displayed value
    /// is never rolled back on failure.
    pub fn apply_valve(&mut self, source: &dyn TelemetrySource) -> Notification {
        if !self.manual_enabled() {
            return Notification::error("Valve control only available in MANUAL mode");
        }
        let opening = self.slider_value;
        match source.set_valve(opening) {
            Ok(ack) if ack.success => {
                self.last_applied = Some(opening);
                Notification::success(format!("Valve set to {opening}%"))
            }
            Ok(ack) => Notification::error(
                ack.message
                    .unwrap_or_else(|| "Failed to set valve".to_string()),
            ),
            Err(err) => {
                log::warn!("valve write failed: {err}");
                Notification::error(WRITE_FAILED)
            }
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}
