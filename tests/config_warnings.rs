//! Tests for the keep-previous-on-invalid configuration policy.
//!
//! Kept in its own test binary because `logtest` installs a process-wide
//! logger.

use lbtcp::{PortRange, RoleClassifier};

#[test]
fn invalid_updates_keep_the_previous_configuration_and_warn() {
    let mut logger = logtest::Logger::start();
    let mut classifier = RoleClassifier::default();
    let before = classifier.config().ports.source;

    // Inverted bounds: update dropped, previous range still in force.
    classifier.set_source_range(15000, 14000);
    assert_eq!(classifier.config().ports.source, before);

    let warning = logger
        .find(|record| record.level() == log::Level::Warn)
        .expect("a warning should be logged for the rejected range");
    assert!(warning.args().contains("previous range retained"));

    // A valid update still applies.
    classifier.set_source_range(15000, 15010);
    assert_eq!(
        classifier.config().ports.source,
        PortRange::new(15000, 15010).expect("valid range")
    );
}
