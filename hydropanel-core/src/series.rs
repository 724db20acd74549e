use chrono::{Local, TimeZone};
use std::collections::VecDeque;
use telemetry::Measurement;

/// Bounded buffer of recent measurements backing the level chart.
///
/// Each poll delivers the authoritative recent history, so `absorb` replaces
/// the window contents wholesale rather than appending; overlapping or
/// reordered batches therefore cannot duplicate points.
pub struct SeriesWindow {
    capacity: usize,
    points: VecDeque<Measurement>,
}

impl SeriesWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            points: VecDeque::new(),
        }
    }

    /// Replace the window with the tail of `measurements`, truncated to
    /// capacity. Returns `false` for an empty batch: the window is left
    /// untouched so a single empty response does not clear the chart.
    pub fn absorb(&mut self, measurements: &[Measurement]) -> bool {
        if measurements.is_empty() {
            return false;
        }
        if let (Some(incoming), Some(held)) = (
            measurements.first().and_then(|m| m.timestamp),
            self.points.back().and_then(|m| m.timestamp),
        ) {
            if incoming < held {
                log::debug!("history batch rewinds past held window ({incoming} < {held})");
            }
        }
        let skip = measurements.len().saturating_sub(self.capacity);
        self.points.clear();
        self.points.extend(measurements[skip..].iter().cloned());
        true
    }

    /// Lazy `(label, level)` projection for rendering. Labels are local
    /// time-of-day when the measurement carries a timestamp, else a 1-based
    /// `#N` fallback that stays positionally stable across calls.
    pub fn points(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(index, measurement)| (point_label(measurement, index), measurement.level))
    }

    pub fn latest(&self) -> Option<&Measurement> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn point_label(measurement: &Measurement, index: usize) -> String {
    let formatted = measurement
        .timestamp
        .and_then(|ts| Local.timestamp_opt(ts, 0).single())
        .map(|when| when.format("%H:%M:%S").to_string());
    formatted.unwrap_or_else(|| format!("#{}", index + 1))
}
