use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTROLLER_URL: &str = "http://localhost:5000";

/// Regulation mode as reported by the controller. `Unconnected` is what the
/// controller reports while its own downstream link is down; it is never sent
/// in a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerMode {
    #[serde(rename = "AUTOMATIC")]
    Automatic,
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "UNCONNECTED")]
    Unconnected,
}

impl ControllerMode {
    pub fn is_manual(self) -> bool {
        matches!(self, ControllerMode::Manual)
    }
}

impl std::fmt::Display for ControllerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ControllerMode::Automatic => "AUTOMATIC",
            ControllerMode::Manual => "MANUAL",
            ControllerMode::Unconnected => "UNCONNECTED",
        };
        f.write_str(label)
    }
}

/// One status poll result. Valid until superseded by the next snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub mode: ControllerMode,
    #[serde(default)]
    pub latest_level: Option<f64>,
    pub valve_opening: u8,
    #[serde(default)]
    pub last_update: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryBatch {
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub count: usize,
}

/// Controller acknowledgement for mode/valve writes. A 2xx response with
/// `success: false` is a rejection, not a transport failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub l1_threshold: f64,
    pub l2_threshold: f64,
    #[serde(default)]
    pub t1_time: Option<f64>,
    #[serde(default)]
    pub t2_timeout: Option<f64>,
    #[serde(default)]
    pub n_measurements: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeRequest {
    pub mode: ControllerMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValveRequest {
    pub opening: u8,
}
