//! Wire format tests: exact bytes, string table sharing and malformed input.

use objpack::{CodecConfig, DocumentLayout, ObjPackError, Value, decode, decode_with, encode};

#[test]
fn test_exact_int_document() {
    let bytes = encode(&Value::Int(300)).unwrap();
    assert_eq!(bytes, [0x07, 0x00, 0x00, 0x00, 0x06, 0x41, 0x2C, 0x00, 0x00]);
}

#[test]
fn test_exact_string_document() {
    let bytes = encode(&Value::from("hi")).unwrap();
    assert_eq!(
        bytes,
        [0x07, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x02, b'h', b'i']
    );
}

#[test]
fn test_repeated_strings_share_one_entry() {
    let words = ["alpha", "beta", "alpha", "alpha", "beta"];
    let value = Value::list(words);
    let bytes = encode(&value).unwrap();

    let layout = DocumentLayout::parse(&bytes).unwrap();
    assert_eq!(layout.string_count, 2);

    let table = objpack::document::read_string_table(&bytes).unwrap();
    assert_eq!(table.iter().collect::<Vec<_>>(), ["alpha", "beta"]);

    // Five references in the body, two strings in the table
    let once = encode(&Value::list(["alpha", "beta"])).unwrap();
    assert_eq!(
        bytes.len() - once.len(),
        3 * 3 - 1,
        "each extra reference costs its tag and sequence number only"
    );
}

#[test]
fn test_record_names_and_values_share_entries() {
    let mut registry = objpack::TypeRegistry::new();
    registry.register_dynamic("shared");
    let config = CodecConfig::new().with_registry(registry);

    let value = Value::list([
        Value::from("shared"),
        Value::record(objpack::DynamicRecord::new("shared", vec![Value::from("shared")])),
    ]);
    let bytes = objpack::encode_with(&value, &config).unwrap();
    assert_eq!(DocumentLayout::parse(&bytes).unwrap().string_count, 1);
    assert_eq!(decode_with(&bytes, &config).unwrap(), value);
}

#[test]
fn test_unknown_tag_99() {
    // header, tag 99, empty string table
    let bytes = [0x05, 0x00, 0x00, 0x00, 99, 0x00, 0x00];
    match decode(&bytes) {
        Err(ObjPackError::UnknownTypeTag { tag, offset }) => {
            assert_eq!(tag, 99);
            assert_eq!(offset, 4);
        }
        other => panic!("expected UnknownTypeTag, got {other:?}"),
    }
}

#[test]
fn test_truncation_before_table_offset() {
    let value = Value::map([("key", Value::list([1i64, 2, 3])), ("other", Value::from("v"))]);
    let bytes = encode(&value).unwrap();
    let layout = DocumentLayout::parse(&bytes).unwrap();

    for cut in 0..layout.table_offset {
        let err = decode(&bytes[..cut]).unwrap_err();
        assert!(err.is_truncated(), "cut at {cut}: {err:?}");
    }
}

#[test]
fn test_truncation_inside_string_table() {
    let bytes = encode(&Value::from("a longer string")).unwrap();
    let err = decode(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn test_body_cannot_read_into_table() {
    // Body claims a list of two ints but only holds one; the string table
    // bytes that follow must not be consumed as the second element.
    let bytes = [0x08, 0x00, 0x00, 0x00, 51, 0x02, 0x06, 0x01, 0x01, 0x01, b'x'];
    let err = decode(&bytes).unwrap_err();
    assert!(err.is_truncated(), "{err:?}");
}

#[test]
fn test_unknown_string_reference() {
    // String tag referencing entry 2 with an empty table
    let bytes = [0x06, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x00];
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(
        err,
        ObjPackError::UnknownStringReference { index: 2, table_len: 0 }
    ));
}

#[test]
fn test_invalid_big_number_text() {
    // Big integer tag pointing at "abc"
    let bytes = [0x07, 0x00, 0x00, 0x00, 13, 0x00, 0x00, 0x01, 0x03, b'a', b'b', b'c'];
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, ObjPackError::InvalidNumber { .. }), "{err:?}");
}

#[test]
fn test_depth_limit_on_decode() {
    let mut value = Value::Null;
    for _ in 0..10 {
        value = Value::List(vec![value]);
    }
    let bytes = encode(&value).unwrap();

    let strict = CodecConfig::new().with_max_depth(5);
    let err = decode_with(&bytes, &strict).unwrap_err();
    assert!(matches!(err, ObjPackError::DepthLimitExceeded { limit: 5 }));

    let loose = CodecConfig::new().with_max_depth(11);
    assert_eq!(decode_with(&bytes, &loose).unwrap(), value);
}

#[test]
fn test_embedded_documents() {
    let first = encode(&Value::from("first")).unwrap();
    let second = encode(&Value::from("second")).unwrap();

    let mut buffer = first.clone();
    buffer.extend_from_slice(&second);

    let config = CodecConfig::default();
    assert_eq!(
        objpack::decode_at(&buffer, 0, &config).unwrap(),
        Value::from("first")
    );
    assert_eq!(
        objpack::decode_at(&buffer, first.len(), &config).unwrap(),
        Value::from("second")
    );
}
