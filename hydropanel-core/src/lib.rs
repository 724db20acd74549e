pub mod config;
pub mod controls;
pub mod link;
pub mod notify;
pub mod series;
pub mod thresholds;

pub use config::PanelConfig;
pub use controls::Controls;
pub use link::{LinkEvent, LinkMonitor, LinkState};
pub use notify::{Notification, NotificationCenter, Severity};
pub use series::SeriesWindow;
pub use thresholds::{LevelBand, Thresholds};
