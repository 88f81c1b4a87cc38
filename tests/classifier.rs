//! Tests for role classification from port ranges and tags.

use lbtcp::{PortRange, Role, RoleClassifier, RolePorts, Tag};
use rstest::{fixture, rstest};

mod common;
use common::{ep, packet};
use lbtcp::PassKind;

fn ports(source: (u16, u16), request: (u16, u16), store: (u16, u16)) -> RolePorts {
    RolePorts {
        source: PortRange::new(source.0, source.1).expect("valid source range"),
        request: PortRange::new(request.0, request.1).expect("valid request range"),
        store: PortRange::new(store.0, store.1).expect("valid store range"),
    }
}

#[fixture]
fn classifier() -> RoleClassifier {
    RoleClassifier::default()
}

/// Source-role boundaries for the default [14371, 14390] source range.
#[rstest]
#[case(14371, true)]
#[case(14380, true)]
#[case(14390, true)]
#[case(14370, false)]
#[case(14391, false)]
fn source_range_bounds_are_inclusive(
    classifier: RoleClassifier,
    #[case] srcport: u16,
    #[case] expected: bool,
) {
    let pkt = packet(ep(1, srcport), ep(2, 40000), 1, PassKind::First).endpoints;
    assert_eq!(classifier.is_from_transport_source(&pkt, None), expected);
}

/// The client check mirrors the source check on the destination port.
#[rstest]
#[case(14371, true)]
#[case(14390, true)]
#[case(14391, false)]
fn client_check_uses_the_destination_port(
    classifier: RoleClassifier,
    #[case] dstport: u16,
    #[case] expected: bool,
) {
    let pkt = packet(ep(1, 40000), ep(2, dstport), 1, PassKind::First).endpoints;
    assert_eq!(classifier.is_from_transport_client(&pkt, None), expected);
}

/// Source role takes precedence over client role, and packets matching
/// neither are not this protocol.
#[rstest]
#[case(14380, 40000, Role::FromSource)]
#[case(40000, 14380, Role::FromClient)]
#[case(14380, 14381, Role::FromSource)]
#[case(40000, 40001, Role::NotTransport)]
fn classification_precedence(
    classifier: RoleClassifier,
    #[case] srcport: u16,
    #[case] dstport: u16,
    #[case] expected: Role,
) {
    let pkt = packet(ep(1, srcport), ep(2, dstport), 1, PassKind::First).endpoints;
    assert_eq!(classifier.classify(&pkt).role, expected);
}

#[rstest]
fn locate_tag_is_none_while_tag_mode_is_off(mut classifier: RoleClassifier) {
    classifier.set_tags(vec![Tag::new("lab", ports((20000, 20010), (20011, 20015), (20016, 20019)))]);
    let pkt = packet(ep(1, 20005), ep(2, 40000), 1, PassKind::First).endpoints;
    assert!(classifier.locate_tag(&pkt).is_none());
}

/// A matching tag's ranges decide classification even when the global
/// ranges would also match.
#[rstest]
fn tag_ranges_take_precedence_over_global_ranges(mut classifier: RoleClassifier) {
    // Tag source range deliberately excludes the global source range.
    classifier.set_tags(vec![Tag::new(
        "lab",
        ports((20000, 20010), (20011, 20015), (14371, 14390)),
    )]);
    classifier.set_use_tags(true);

    // Global ranges say FromSource; the tag matches via its store range
    // and its own source range says otherwise.
    let pkt = packet(ep(1, 14380), ep(2, 40000), 1, PassKind::First).endpoints;
    let classification = classifier.classify(&pkt);
    assert_eq!(
        classification.tag.map(|tag| tag.name.as_str()),
        Some("lab"),
        "tag should match on either port",
    );
    assert_eq!(classification.role, Role::NotTransport);

    // A packet inside the tag's source range classifies FromSource.
    let pkt = packet(ep(1, 20005), ep(2, 40000), 1, PassKind::First).endpoints;
    assert_eq!(classifier.classify(&pkt).role, Role::FromSource);
}

/// Tags are consulted in configuration order; the first match wins.
#[rstest]
fn first_matching_tag_wins(mut classifier: RoleClassifier) {
    classifier.set_tags(vec![
        Tag::new("first", ports((20000, 20010), (20011, 20012), (20013, 20014))),
        Tag::new("second", ports((20000, 20010), (20011, 20012), (20013, 20014))),
    ]);
    classifier.set_use_tags(true);

    let pkt = packet(ep(1, 20005), ep(2, 40000), 1, PassKind::First).endpoints;
    let located = classifier.locate_tag(&pkt).expect("tag should match");
    assert_eq!(located.name, "first");
}

#[rstest]
fn port_range_rejects_inverted_bounds() {
    assert!(PortRange::new(100, 99).is_err());
    assert!(PortRange::new(100, 100).is_ok());
}
