use chrono::{Local, TimeZone};
use hydropanel_core::SeriesWindow;
use telemetry::Measurement;

fn measurement(timestamp: Option<i64>, level: f64) -> Measurement {
    Measurement { timestamp, level }
}

#[test]
fn over_capacity_batch_keeps_exactly_the_tail() {
    let mut window = SeriesWindow::new(50);
    let batch: Vec<_> = (0..60)
        .map(|i| measurement(Some(1000 + i), i as f64))
        .collect();

    assert!(window.absorb(&batch));
    assert_eq!(window.len(), 50);

    let levels: Vec<f64> = window.points().map(|(_, level)| level).collect();
    let expected: Vec<f64> = (10..60).map(|i| i as f64).collect();
    assert_eq!(levels, expected);
}

#[test]
fn absorb_replaces_instead_of_appending() {
    let mut window = SeriesWindow::new(50);
    window.absorb(&[measurement(Some(1000), 1.0), measurement(Some(1002), 2.0)]);
    window.absorb(&[measurement(Some(1002), 2.0), measurement(Some(1004), 3.0)]);

    assert_eq!(window.len(), 2);
    let levels: Vec<f64> = window.points().map(|(_, level)| level).collect();
    assert_eq!(levels, vec![2.0, 3.0]);
}

#[test]
fn empty_batch_leaves_window_and_projection_unchanged() {
    let mut window = SeriesWindow::new(50);
    window.absorb(&[measurement(Some(1000), 12.3)]);
    let before: Vec<_> = window.points().collect();

    assert!(!window.absorb(&[]));
    assert_eq!(window.len(), 1);
    let after: Vec<_> = window.points().collect();
    assert_eq!(before, after);
}

#[test]
fn single_timestamped_point_renders_time_of_day_label() {
    let mut window = SeriesWindow::new(50);
    window.absorb(&[measurement(Some(1000), 12.3)]);

    let points: Vec<_> = window.points().collect();
    assert_eq!(points.len(), 1);

    let expected = Local
        .timestamp_opt(1000, 0)
        .single()
        .expect("epoch 1000")
        .format("%H:%M:%S")
        .to_string();
    assert_eq!(points[0], (expected, 12.3));
}

#[test]
fn missing_timestamps_fall_back_to_stable_indexes() {
    let mut window = SeriesWindow::new(50);
    window.absorb(&[measurement(None, 1.5), measurement(None, 2.5)]);

    let labels: Vec<String> = window.points().map(|(label, _)| label).collect();
    assert_eq!(labels, vec!["#1".to_string(), "#2".to_string()]);

    // Restartable: a second pass yields the same labels.
    let again: Vec<String> = window.points().map(|(label, _)| label).collect();
    assert_eq!(labels, again);
}

#[test]
fn zero_capacity_is_clamped_to_one() {
    let mut window = SeriesWindow::new(0);
    window.absorb(&[measurement(None, 1.0), measurement(None, 2.0)]);
    assert_eq!(window.len(), 1);
    assert_eq!(window.latest().map(|m| m.level), Some(2.0));
}
