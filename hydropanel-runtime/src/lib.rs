pub mod panel;
pub mod scheduler;

pub use panel::{spawn_panel, PanelCommand, PanelEvent};
pub use scheduler::{CycleOutcome, PollScheduler, SchedulerState};
