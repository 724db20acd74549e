use chrono::{Local, TimeZone};
use hydropanel_core::{LevelBand, LinkState};
use hydropanel_runtime::PanelEvent;
use telemetry::{ControllerConfig, HealthReport, HistoryBatch, StatusSnapshot};

pub fn print_info(message: &str) {
    println!("[hydropanel][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[hydropanel][ERROR]: {message}");
}

fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|when| when.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch.to_string())
}

fn format_level(level: Option<f64>) -> String {
    match level {
        Some(level) => format!("{level:.1} cm"),
        None => "--".to_string(),
    }
}

pub fn print_status(status: &StatusSnapshot) {
    print_info(&format!("Mode: {}", status.mode));
    print_info(&format!("Water level: {}", format_level(status.latest_level)));
    print_info(&format!("Valve opening: {}%", status.valve_opening));
    match status.last_update {
        Some(epoch) => print_info(&format!("Last update: {}", format_epoch(epoch))),
        None => print_info("Last update: never"),
    }
}

pub fn print_history(batch: &HistoryBatch, limit: Option<usize>) {
    if batch.measurements.is_empty() {
        print_info("No measurements recorded");
        return;
    }
    print_info(&format!("{} measurements:", batch.count));
    let skip = limit
        .map(|limit| batch.measurements.len().saturating_sub(limit))
        .unwrap_or(0);
    for (index, measurement) in batch.measurements.iter().enumerate().skip(skip) {
        let label = match measurement.timestamp {
            Some(epoch) => format_epoch(epoch),
            None => format!("#{}", index + 1),
        };
        println!("{label}\t{:.1} cm", measurement.level);
    }
}

pub fn print_config(config: &ControllerConfig) {
    print_info(&format!("L1 threshold: {} cm", config.l1_threshold));
    print_info(&format!("L2 threshold: {} cm", config.l2_threshold));
    if let Some(t1) = config.t1_time {
        print_info(&format!("T1 time: {t1} s"));
    }
    if let Some(t2) = config.t2_timeout {
        print_info(&format!("T2 timeout: {t2} s"));
    }
    if let Some(n) = config.n_measurements {
        print_info(&format!("Measurement window: {n}"));
    }
}

pub fn print_health(report: &HealthReport) {
    if report.service.is_empty() {
        print_info(&format!("Controller health: {}", report.status));
    } else {
        print_info(&format!(
            "Controller health: {} ({})",
            report.status, report.service
        ));
    }
}

fn link_label(state: LinkState) -> &'static str {
    match state {
        LinkState::Connected => "Connected",
        LinkState::Connecting => "Connecting...",
        LinkState::Disconnected => "Disconnected",
    }
}

fn band_label(band: LevelBand) -> &'static str {
    match band {
        LevelBand::Normal => "normal",
        LevelBand::Warning => "warning",
        LevelBand::Critical => "critical",
    }
}

pub fn print_event(event: &PanelEvent) {
    match event {
        PanelEvent::LinkChanged(state) => {
            print_info(&format!("Connection: {}", link_label(*state)));
        }
        PanelEvent::StatusUpdated {
            mode,
            valve_reading,
            slider_value,
            latest_level,
            band,
            ..
        } => {
            let band = band
                .map(|band| format!(" [{}]", band_label(band)))
                .unwrap_or_default();
            print_info(&format!(
                "Mode {mode} | level {}{band} | valve {valve_reading}% | slider {slider_value}%",
                format_level(*latest_level),
            ));
        }
        PanelEvent::SeriesRefreshed { points, count } => {
            if let Some((label, level)) = points.last() {
                print_info(&format!("Chart: {count} points, latest {label} {level:.1} cm"));
            }
        }
        PanelEvent::Toast(notification) => {
            println!(
                "[hydropanel][{}] {}",
                notification.severity.label().to_uppercase(),
                notification.message
            );
        }
    }
}
