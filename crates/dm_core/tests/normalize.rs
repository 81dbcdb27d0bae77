use dm_core::normalize::{normalize, CanonicalMetadata};
use dm_core::types::{RawMetadata, RawValue};

fn sample_pairs() -> Vec<(&'static str, RawValue)> {
    vec![
        ("title", RawValue::from("Quarterly report  ")),
        ("page_count", RawValue::Integer(12)),
        ("encrypted", RawValue::Bool(false)),
        ("ratio", RawValue::Float(0.25)),
        ("Author", RawValue::from("Jane Doe")),
        ("subject", RawValue::Null),
    ]
}

#[test]
fn normalize_is_independent_of_insertion_order() {
    let forward: RawMetadata = sample_pairs().into_iter().collect();
    let reversed: RawMetadata = sample_pairs().into_iter().rev().collect();

    let a = normalize(&forward);
    let b = normalize(&reversed);
    assert_eq!(a, b);
    assert_eq!(a.to_lines().as_bytes(), b.to_lines().as_bytes());
    assert_eq!(a.to_json().expect("json"), b.to_json().expect("json"));
}

#[test]
fn normalize_orders_by_byte_order_and_renders_types() {
    let raw: RawMetadata = sample_pairs().into_iter().collect();
    let canonical = normalize(&raw);

    let names: Vec<&str> = canonical.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["Author", "encrypted", "page_count", "ratio", "title"]);
    assert_eq!(
        canonical.to_lines(),
        "Author=Jane Doe\nencrypted=false\npage_count=12\nratio=0.25\ntitle=Quarterly report\n"
    );
}

#[test]
fn normalize_is_repeatable() {
    let raw: RawMetadata = sample_pairs().into_iter().collect();
    assert_eq!(normalize(&raw), normalize(&raw));
}

#[test]
fn normalize_negative_integers_and_floats() {
    let raw: RawMetadata = vec![
        ("offset", RawValue::Integer(-42)),
        ("scale", RawValue::Float(-1.500)),
        ("whole", RawValue::Float(3.0)),
    ]
    .into_iter()
    .collect();
    let canonical = normalize(&raw);
    assert_eq!(canonical.get("offset"), Some("-42"));
    assert_eq!(canonical.get("scale"), Some("-1.5"));
    assert_eq!(canonical.get("whole"), Some("3"));
}

#[test]
fn canonical_json_round_trips_through_record_form() {
    let canonical = CanonicalMetadata::from_pairs([("pages", "3"), ("author", "Jane Doe")]);
    let json = canonical.to_json().expect("json");
    assert_eq!(json, r#"{"author":"Jane Doe","pages":"3"}"#);
    assert_eq!(CanonicalMetadata::from_json(&json).expect("parse"), canonical);
}

#[test]
fn canonical_from_json_rejects_non_string_values() {
    let err = CanonicalMetadata::from_json(r#"{"pages":3}"#).expect_err("non-string");
    assert_eq!(err.code, "DM_RECORD_CORRUPT");
}

#[test]
fn normalize_drops_whitespace_only_text() {
    let raw: RawMetadata = vec![
        ("keywords", RawValue::from("   ")),
        ("title", RawValue::from("Plan")),
    ]
    .into_iter()
    .collect();
    let canonical = normalize(&raw);
    assert_eq!(canonical.get("keywords"), None);
    assert_eq!(canonical.to_lines(), "title=Plan\n");
}

#[test]
fn canonical_lines_escape_line_breaks_and_separators() {
    let raw: RawMetadata = vec![("description", RawValue::from("x\nkeywords=y\r\\z"))]
        .into_iter()
        .collect();
    let canonical = normalize(&raw);
    assert_eq!(canonical.get("description"), Some("x\nkeywords=y\r\\z"));
    assert_eq!(canonical.to_lines(), "description=x\\nkeywords=y\\r\\\\z\n");

    let odd_name = CanonicalMetadata::from_pairs([("a=b", "c")]);
    assert_eq!(odd_name.to_lines(), "a\\=b=c\n");
}
