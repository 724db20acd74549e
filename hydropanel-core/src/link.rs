/// Connection state as shown to the operator. `Connecting` is cosmetic: the
/// link is down but a poll is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Connected,
    Disconnected,
}

/// Edge-triggered transition, emitted at most once per actual state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Reconnected,
    ConnectionLost,
}

/// Derives the connection state from poll outcomes. Repeated successes while
/// connected (or failures while disconnected) change nothing, so dependents
/// react only to transitions instead of every tick.
pub struct LinkMonitor {
    connected: bool,
    outstanding: bool,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self {
            connected: false,
            outstanding: false,
        }
    }

    pub fn state(&self) -> LinkState {
        if self.connected {
            LinkState::Connected
        } else if self.outstanding {
            LinkState::Connecting
        } else {
            LinkState::Disconnected
        }
    }

    /// A poll cycle has been dispatched and is not yet settled.
    pub fn poll_started(&mut self) {
        self.outstanding = true;
    }

    pub fn record_success(&mut self) -> Option<LinkEvent> {
        self.outstanding = false;
        if self.connected {
            None
        } else {
            self.connected = true;
            Some(LinkEvent::Reconnected)
        }
    }

    pub fn record_failure(&mut self) -> Option<LinkEvent> {
        if self.connected {
            // Show the outage at the transition; later retries show as
            // Connecting again once their poll is dispatched.
            self.connected = false;
            self.outstanding = false;
            Some(LinkEvent::ConnectionLost)
        } else {
            None
        }
    }
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new()
    }
}
