pub mod client;
pub mod protocol;

pub use client::{HttpTelemetry, TelemetryError, TelemetrySource};
pub use protocol::{
    ControllerConfig, ControllerMode, HealthReport, HistoryBatch, Measurement, StatusSnapshot,
    WriteAck, DEFAULT_CONTROLLER_URL,
};
