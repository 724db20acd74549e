use crate::protocol::{
    ControllerConfig, ControllerMode, HealthReport, HistoryBatch, ModeRequest, StatusSnapshot,
    ValveRequest, WriteAck,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const STATUS_PATH: &str = "/api/status";
const HISTORY_PATH: &str = "/api/rainwater";
const MODE_PATH: &str = "/api/mode";
const VALVE_PATH: &str = "/api/valve";
const CONFIG_PATH: &str = "/api/config";
const HEALTH_PATH: &str = "/health";

/// Non-2xx responses and unreachable hosts collapse into `Transport`; a
/// response that arrives but does not decode is `Payload`. Both count as a
/// failed poll, no distinction beyond the message.
#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("controller unreachable: {0}")]
    Transport(String),
    #[error("malformed controller response: {0}")]
    Payload(String),
}

/// The six controller operations the panel consumes. Implemented over HTTP in
/// production; tests substitute scripted sources.
pub trait TelemetrySource: Send + Sync {
    fn fetch_status(&self) -> Result<StatusSnapshot, TelemetryError>;
    fn fetch_history(&self) -> Result<HistoryBatch, TelemetryError>;
    fn fetch_config(&self) -> Result<ControllerConfig, TelemetryError>;
    fn health(&self) -> Result<HealthReport, TelemetryError>;
    fn set_mode(&self, mode: ControllerMode) -> Result<WriteAck, TelemetryError>;
    fn set_valve(&self, opening: u8) -> Result<WriteAck, TelemetryError>;
}

pub struct HttpTelemetry {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTelemetry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TelemetryError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|err| TelemetryError::Transport(err.to_string()))?;
        response
            .into_json::<T>()
            .map_err(|err| TelemetryError::Payload(err.to_string()))
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl Serialize,
    ) -> Result<T, TelemetryError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|err| TelemetryError::Transport(err.to_string()))?;
        response
            .into_json::<T>()
            .map_err(|err| TelemetryError::Payload(err.to_string()))
    }
}

impl TelemetrySource for HttpTelemetry {
    fn fetch_status(&self) -> Result<StatusSnapshot, TelemetryError> {
        self.get_json(STATUS_PATH)
    }

    fn fetch_history(&self) -> Result<HistoryBatch, TelemetryError> {
        self.get_json(HISTORY_PATH)
    }

    fn fetch_config(&self) -> Result<ControllerConfig, TelemetryError> {
        self.get_json(CONFIG_PATH)
    }

    fn health(&self) -> Result<HealthReport, TelemetryError> {
        self.get_json(HEALTH_PATH)
    }

    fn set_mode(&self, mode: ControllerMode) -> Result<WriteAck, TelemetryError> {
        self.post_json(MODE_PATH, ModeRequest { mode })
    }

    fn set_valve(&self, opening: u8) -> Result<WriteAck, TelemetryError> {
        self.post_json(VALVE_PATH, ValveRequest { opening })
    }
}
