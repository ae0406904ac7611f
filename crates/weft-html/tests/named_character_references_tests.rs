//! Integration tests for named character reference lookup.

use weft_html::tokenizer::named_character_references::{any_entity_has_prefix, lookup_entity};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
    assert_eq!(lookup_entity("notin;"), Some("\u{2209}"));
}

#[test]
fn test_lookup_full_table() {
    assert_eq!(lookup_entity("ThinSpace;"), Some("\u{2009}"));
    assert_eq!(lookup_entity("CounterClockwiseContourIntegral;"), Some("\u{2233}"));
    assert_eq!(lookup_entity("fjlig;"), Some("fj"));
    assert_eq!(lookup_entity("NewLine;"), Some("\n"));
    assert_eq!(lookup_entity("zwnj;"), Some("\u{200C}"));
    // Only the HTML 4 names are legacy
    assert_eq!(lookup_entity("ThinSpace"), None);
}

#[test]
fn test_lookup_legacy_entities() {
    // Only the legacy names match without a semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("copy"), Some("\u{00A9}"));
    assert_eq!(lookup_entity("not"), Some("\u{00AC}"));
    assert_eq!(lookup_entity("notin"), None);
}

#[test]
fn test_lookup_is_case_sensitive() {
    assert_eq!(lookup_entity("AMP;"), Some("&"));
    assert_eq!(lookup_entity("Amp;"), None);
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("a")); // amp, apos, alpha, etc.
    assert!(any_entity_has_prefix("am")); // amp
    assert!(any_entity_has_prefix("amp")); // amp, amp;
    assert!(any_entity_has_prefix("amp;")); // amp;
    assert!(any_entity_has_prefix("noti")); // notin;
    assert!(!any_entity_has_prefix("ampx")); // nothing
    assert!(!any_entity_has_prefix("xyz")); // nothing
}
