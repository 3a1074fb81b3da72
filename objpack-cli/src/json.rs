//! Bridge between JSON documents and objpack values.
//!
//! JSON to value: integers that fit `i64` become longs, larger unsigned
//! integers big integers and every other number a double. Arrays become
//! lists and objects become string-keyed maps.
//!
//! Value to JSON picks the closest JSON form for each variant. Big numbers
//! become strings so no digits are lost, dates become `{"kind", "millis"}`
//! objects and records become `{"@type", "fields"}` objects.

use objpack::{BigInteger, DateKind, Value};
use serde_json::{Map, Number, Value as Json, json};

/// Convert a parsed JSON document.
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Long(i),
            (None, Some(u)) => Value::BigInteger(BigInteger::from(u)),
            (None, None) => n.as_f64().map_or(Value::Null, Value::Double),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(from_json).collect()),
        Json::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (Value::String(k.clone()), from_json(v)))
                .collect(),
        ),
    }
}

/// Convert a value for JSON output.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::String(s) => Json::String(s.clone()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Char(c) => Json::String(String::from_utf16_lossy(&[*c])),
        Value::Byte(v) => json!(v),
        Value::Short(v) => json!(v),
        Value::Int(v) | Value::AtomicInt(v) => json!(v),
        Value::Long(v) | Value::AtomicLong(v) => json!(v),
        Value::Float(v) => float(f64::from(*v)),
        Value::Double(v) => float(*v),
        Value::BigDecimal(d) => Json::String(d.to_string()),
        Value::BigInteger(i) => Json::String(i.to_string()),
        Value::Date(d) => {
            let kind = match &d.kind {
                DateKind::Date => "date",
                DateKind::Time => "time",
                DateKind::Timestamp => "timestamp",
                DateKind::Generic => "instant",
                DateKind::Other(name) => name.as_str(),
            };
            json!({ "kind": kind, "millis": d.millis })
        }
        Value::Record(r) => json!({
            "@type": r.type_name(),
            "fields": r.fields().iter().map(to_json).collect::<Vec<_>>(),
        }),
        Value::BoolArray(items) => json!(items),
        Value::ByteArray(bytes) | Value::Serialized(bytes) => json!(bytes),
        Value::CharArray(units) => Json::String(String::from_utf16_lossy(units)),
        Value::ShortArray(items) => json!(items),
        Value::IntArray(items) => json!(items),
        Value::LongArray(items) => json!(items),
        Value::FloatArray(items) => Json::Array(items.iter().map(|&v| float(f64::from(v))).collect()),
        Value::DoubleArray(items) => Json::Array(items.iter().map(|&v| float(v)).collect()),
        Value::StringArray(items) => json!(items),
        Value::Array(items) | Value::List(items) | Value::Set(items) => {
            Json::Array(items.iter().map(to_json).collect())
        }
        Value::Map(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (k, v) in entries {
                let key = match k.as_str() {
                    Some(s) => s.to_owned(),
                    None => to_json(k).to_string(),
                };
                map.insert(key, to_json(v));
            }
            Json::Object(map)
        }
        Value::Extension(ext) => json!({
            "@extension": ext.tag(),
            "payload": format!("{:?}", ext.payload()),
        }),
    }
}

/// JSON has no NaN or infinities; those become strings.
fn float(v: f64) -> Json {
    match Number::from_f64(v) {
        Some(n) => Json::Number(n),
        None if v.is_nan() => Json::String("NaN".into()),
        None if v > 0.0 => Json::String("Infinity".into()),
        None => Json::String("-Infinity".into()),
    }
}
