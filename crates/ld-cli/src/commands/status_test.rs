use super::*;
use ld_migrate::StepId;

#[test]
fn test_format_report_upgrade() {
    let report = StatusReport::new(Some(StepId::new(5)), StepId::new(10));
    assert_eq!(
        format_report(&report),
        "Status: requires upgrade\nLast applied step: 5\nLatest step: 10\nPending steps: 5"
    );
}

#[test]
fn test_format_report_fresh_install() {
    let report = StatusReport::new(None, StepId::new(10));
    let text = format_report(&report);
    assert!(text.starts_with("Status: fresh install\nLast applied step: none"));
    assert!(text.ends_with("Pending steps: 10"));
}

#[test]
fn test_format_report_up_to_date() {
    let report = StatusReport::new(Some(StepId::new(10)), StepId::new(10));
    assert!(!format_report(&report).contains("Pending"));
}
