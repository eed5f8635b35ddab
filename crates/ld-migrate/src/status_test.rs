use super::*;

fn id(n: u32) -> StepId {
    StepId::new(n)
}

#[test]
fn test_compute() {
    assert_eq!(MigrationStatus::compute(None, id(10)), MigrationStatus::FreshInstall);
    assert_eq!(MigrationStatus::compute(Some(id(10)), id(10)), MigrationStatus::UpToDate);
    assert_eq!(
        MigrationStatus::compute(Some(id(5)), id(10)),
        MigrationStatus::RequiresUpgrade
    );
    assert_eq!(
        MigrationStatus::compute(Some(id(11)), id(10)),
        MigrationStatus::RequiresDowngrade
    );
}

#[test]
fn test_pending() {
    assert_eq!(StatusReport::new(None, id(10)).pending(), 10);
    assert_eq!(StatusReport::new(Some(id(5)), id(10)).pending(), 5);
    assert_eq!(StatusReport::new(Some(id(10)), id(10)).pending(), 0);
    assert_eq!(StatusReport::new(Some(id(12)), id(10)).pending(), 0);
}

#[test]
fn test_display() {
    assert_eq!(MigrationStatus::RequiresUpgrade.to_string(), "requires upgrade");
}
