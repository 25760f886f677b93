//! Byte-level checks of the documents this crate writes and accepts.

mod common;

use serde_json::{json, Value as Json};
use tytx_bag::{
    from_slice, from_str, msgpack, to_string, to_string_compact, to_vec, to_vec_compact, Error, TytxOptions,
    WireValue,
};

fn json_body(text: &str) -> Json {
    let body = text.strip_suffix("::JS").expect("text output carries the marker");
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_simple_expanded_layout() {
    let doc = json_body(&to_string(&common::simple()).unwrap());
    assert_eq!(
        doc,
        json!({"rows": [
            ["", "name", "T", "test", {}],
            ["", "count", "L", 42, {}],
            ["", "price", "N", "99.99::N", {}],
            ["", "active", "B", true, {}],
            ["", "empty", "NN", null, {}]
        ]})
    );
}

#[test]
fn test_nested_compact_layout() {
    let doc = json_body(&to_string_compact(&common::nested()).unwrap());
    assert_eq!(
        doc,
        json!({
            "rows": [
                [null, "config", "::X"],
                [0, "host", "localhost"],
                [0, "port", 5432],
                [0, "enabled", true],
                [null, "users", "::X"],
                [1, "admin", "::X"],
                [2, "name", "Admin"],
                [2, "email", "admin@example.com"],
                [1, "guest", "::X"],
                [3, "name", "Guest"]
            ],
            "paths": {"0": "config", "1": "users", "2": "users.admin", "3": "users.guest"}
        })
    );
}

#[test]
fn test_typed_payloads() {
    let doc = json_body(&to_string(&common::typed()).unwrap());
    let values: Vec<&Json> = doc["rows"].as_array().unwrap().iter().map(|row| &row[3]).collect();
    assert_eq!(
        values,
        vec![
            &json!("123.456::N"),
            &json!("2025-06-15::D"),
            &json!("2025-06-15T14:30:45::DH"),
            &json!("10:30:00::H"),
            &json!(999),
            &json!(1.5),
            &json!(false),
            &json!(null),
            &json!("Hello, World!"),
        ]
    );
}

#[test]
fn test_decimal_scale_is_kept_on_the_wire() {
    let text = to_string(&common::with_attrs()).unwrap();
    assert!(text.contains(r#""50.00::N""#));
}

#[test]
fn test_compact_keeps_attributes_only_when_present() {
    let doc = json_body(&to_string_compact(&common::with_attrs()).unwrap());
    let rows = doc["rows"].as_array().unwrap();
    assert_eq!(rows[0], json!([null, "item1", "value1", {"color": "red", "size": 10}]));
    assert_eq!(rows[2], json!([null, "nested", "::X"]));
    assert_eq!(rows[3], json!([0, "child", "deep", {"level": 2}]));
}

#[test]
fn test_binary_and_text_carry_the_same_document() {
    for (name, bag) in common::fixtures() {
        for (text, bytes) in [
            (to_string(&bag).unwrap(), to_vec(&bag).unwrap()),
            (to_string_compact(&bag).unwrap(), to_vec_compact(&bag).unwrap()),
        ] {
            let from_text: WireValue = serde_json::from_str(text.strip_suffix("::JS").unwrap()).unwrap();
            let from_binary = msgpack::from_slice(&bytes).unwrap();
            assert_eq!(from_text, from_binary, "{}", name);
        }
    }
}

#[test]
fn test_file_conventions_drop_the_marker() {
    let options = TytxOptions::from_file_name("fixtures/simple_compact.bag.json").unwrap();
    let bytes = tytx_bag::to_bytes_with_options(&common::simple(), options).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(!text.ends_with("::JS"));
    assert_eq!(from_str(&text).unwrap(), common::simple());
}

#[test]
fn test_foreign_documents_are_accepted() {
    // Whitespace, an explicit null tag column and ::NN are all legal input.
    let text = r#"
        {"rows": [
            ["", "a", null, "::NN", {}],
            ["", "b", "DHZ", "2025-01-15T10:30:00::DH", {"note": "x::y::T"}]
        ]}::JS
    "#;
    let bag = from_str(text).unwrap();
    assert!(bag.get("a").unwrap().is_null());
    assert_eq!(bag.get("b").unwrap().as_datetime().unwrap().offset_seconds(), Some(0));
    assert_eq!(
        bag.get_node("b").unwrap().get_attr("note"),
        Some(&tytx_bag::Value::from("x::y"))
    );
}

#[test]
fn test_integer_overflow_is_malformed() {
    let err = from_str(r#"{"rows":[["","n","L",18446744073709551615,{}]]}"#).unwrap_err();
    assert!(matches!(err, Error::MalformedDocument { .. }));
}

#[test]
fn test_binary_rejects_foreign_items() {
    // {"rows": [["", "a", null, <bin8 len 1>, {}]]}
    let bytes = [
        0x81, 0xa4, b'r', b'o', b'w', b's', 0x91, 0x95, 0xa0, 0xa1, b'a', 0xc0, 0xc4, 0x01, 0xff, 0x80,
    ];
    assert!(matches!(from_slice(&bytes), Err(Error::TransportMismatch { .. })));
}

#[test]
fn test_binary_rejects_truncation() {
    let bytes = to_vec(&common::complex()).unwrap();
    for cut in [1, bytes.len() / 2, bytes.len() - 1] {
        assert!(
            matches!(from_slice(&bytes[..cut]), Err(Error::MalformedDocument { .. })),
            "cut at {}",
            cut
        );
    }
}
