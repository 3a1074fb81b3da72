//! Extension hook and fallback serializer integration tests.

use objpack::{
    CodecConfig, ExtensionHook, ExtensionValue, FallbackSerializer, ObjPackError, ObjectDecoder,
    ObjectEncoder, Result, Value, decode, decode_with, encode, encode_with,
};
use std::borrow::Cow;

const POINT_TAG: u8 = 100;

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    label: String,
}

fn point(x: i32, y: i32, label: &str) -> Value {
    Value::Extension(ExtensionValue::new(
        POINT_TAG,
        Point {
            x,
            y,
            label: label.to_string(),
        },
    ))
}

struct PointHook;

impl ExtensionHook for PointHook {
    fn try_encode(&self, encoder: &mut ObjectEncoder<'_>, value: &Value) -> Result<bool> {
        let Some(p) = value.as_extension::<Point>() else {
            return Ok(false);
        };
        encoder.write_tag(POINT_TAG);
        encoder.write_i32(p.x);
        encoder.write_i32(p.y);
        encoder.write_string(&p.label)?;
        Ok(true)
    }

    fn try_decode(&self, decoder: &mut ObjectDecoder<'_>, tag: u8) -> Result<Option<Value>> {
        if tag != POINT_TAG {
            return Ok(None);
        }
        let x = decoder.read_i32()?;
        let y = decoder.read_i32()?;
        let label = decoder.read_string()?;
        Ok(Some(point(x, y, label)))
    }
}

#[test]
fn test_point_roundtrip_through_hook() {
    let config = CodecConfig::new().with_hook(PointHook);
    let value = Value::list([point(1, -2, "origin-ish"), point(i32::MAX, 0, "origin-ish")]);

    let bytes = encode_with(&value, &config).unwrap();
    assert_eq!(decode_with(&bytes, &config).unwrap(), value);

    // The label is shared through the string table
    let layout = objpack::DocumentLayout::parse(&bytes).unwrap();
    assert_eq!(layout.string_count, 1);
}

#[test]
fn test_point_without_hook_is_unknown_tag() {
    let config = CodecConfig::new().with_hook(PointHook);
    let bytes = encode_with(&point(3, 4, "p"), &config).unwrap();

    let err = decode(&bytes).unwrap_err();
    assert!(
        matches!(err, ObjPackError::UnknownTypeTag { tag: POINT_TAG, offset: 4 }),
        "{err:?}"
    );

    let stripped = config.without_hook();
    assert!(stripped.hook().is_none());
    let err = decode_with(&bytes, &stripped).unwrap_err();
    assert!(matches!(err, ObjPackError::UnknownTypeTag { tag: POINT_TAG, .. }));
}

#[test]
fn test_unhandled_extension_encodes_as_null() {
    let bytes = encode(&point(1, 1, "lost")).unwrap();
    assert_eq!(decode(&bytes).unwrap(), Value::Null);
}

struct StrictHook;

impl ExtensionHook for StrictHook {
    fn on_unhandled_tag(&self, tag: u8, _offset: usize) -> ObjPackError {
        ObjPackError::extension(tag, "no decoder registered")
    }
}

#[test]
fn test_custom_unhandled_tag_error() {
    // Tag 200 followed by garbage
    let bytes = [0x06, 0x00, 0x00, 0x00, 200, 0x01, 0x00, 0x00];
    let config = CodecConfig::new().with_hook(StrictHook);
    let err = decode_with(&bytes, &config).unwrap_err();
    assert!(matches!(err, ObjPackError::Extension { tag: 200, .. }), "{err:?}");
}

#[test]
fn test_unassigned_builtin_tag_bypasses_hook() {
    let bytes = [0x05, 0x00, 0x00, 0x00, 42, 0x00, 0x00];
    let config = CodecConfig::new().with_hook(StrictHook);
    let err = decode_with(&bytes, &config).unwrap_err();
    assert!(matches!(err, ObjPackError::UnknownTypeTag { tag: 42, .. }));
}

/// Rewrites strings on the way in and out.
struct CaseHook;

impl ExtensionHook for CaseHook {
    fn pre_encode<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        match value {
            Value::String(s) => Cow::Owned(Value::String(s.to_lowercase())),
            other => Cow::Borrowed(other),
        }
    }

    fn post_decode(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        }
    }
}

#[test]
fn test_pre_encode_and_post_decode() {
    let config = CodecConfig::new().with_hook(CaseHook);
    let value = Value::list(["MiXeD", "mixed"]);
    let bytes = encode_with(&value, &config).unwrap();

    // Both strings were lowered before interning
    assert_eq!(objpack::DocumentLayout::parse(&bytes).unwrap().string_count, 1);
    assert_eq!(decode(&bytes).unwrap(), Value::list(["mixed", "mixed"]));
    assert_eq!(
        decode_with(&bytes, &config).unwrap(),
        Value::list(["MIXED", "MIXED"])
    );
}

#[derive(Debug, PartialEq)]
struct Opaque(Vec<u8>);

const OPAQUE_TAG: u8 = 180;

struct OpaqueFallback;

impl FallbackSerializer for OpaqueFallback {
    fn serialize(&self, value: &ExtensionValue) -> Option<Vec<u8>> {
        value.downcast_ref::<Opaque>().map(|o| o.0.clone())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        Ok(Value::Extension(ExtensionValue::new(
            OPAQUE_TAG,
            Opaque(bytes.to_vec()),
        )))
    }
}

#[test]
fn test_fallback_roundtrip() {
    let config = CodecConfig::new().with_fallback(OpaqueFallback);
    let value = Value::Extension(ExtensionValue::new(OPAQUE_TAG, Opaque(vec![9, 8, 7])));

    let bytes = encode_with(&value, &config).unwrap();
    assert_eq!(bytes[4], 60);
    assert_eq!(decode_with(&bytes, &config).unwrap(), value);

    // Without a fallback the payload surfaces as raw bytes
    assert_eq!(decode(&bytes).unwrap(), Value::Serialized(vec![9, 8, 7]));
}

#[test]
fn test_fallback_declines_unknown_payload() {
    let config = CodecConfig::new().with_fallback(OpaqueFallback);
    let value = Value::Extension(ExtensionValue::new(OPAQUE_TAG, "not opaque".to_string()));
    let bytes = encode_with(&value, &config).unwrap();
    assert_eq!(decode_with(&bytes, &config).unwrap(), Value::Null);
}

#[test]
fn test_serialized_without_fallback_roundtrips() {
    let value = Value::Serialized(vec![0xCA, 0xFE]);
    let bytes = encode(&value).unwrap();
    assert_eq!(decode(&bytes).unwrap(), value);

    // Empty payload reads back as null
    let bytes = encode(&Value::Serialized(Vec::new())).unwrap();
    assert_eq!(decode(&bytes).unwrap(), Value::Null);
}
