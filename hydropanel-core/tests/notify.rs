use hydropanel_core::{Notification, NotificationCenter, Severity};
use std::thread;
use std::time::Duration;

#[test]
fn toasts_expire_after_the_display_duration() {
    let mut center = NotificationCenter::new(Duration::from_millis(20));
    center.show(Notification::success("Valve set to 42%"));
    center.show(Notification::error("Lost connection to controller"));
    assert_eq!(center.active().len(), 2);

    center.sweep_expired();
    assert_eq!(center.active().len(), 2);

    thread::sleep(Duration::from_millis(40));
    center.sweep_expired();
    assert!(center.active().is_empty());
}

#[test]
fn constructors_carry_severity() {
    assert_eq!(Notification::success("ok").severity, Severity::Success);
    assert_eq!(Notification::error("bad").severity, Severity::Error);
    assert_eq!(
        Notification::new(Severity::Info, "note").severity,
        Severity::Info
    );
    assert_eq!(Severity::Error.label(), "error");
}
