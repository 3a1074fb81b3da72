//! Caller-defined types: extension hooks and the fallback serializer.
//!
//! An [`ExtensionHook`] sees every value before the built-in dispatch and may
//! claim it, writing its own tag (100-254) and payload through the
//! [`ObjectEncoder`] helpers. On decode, tags in that range are offered to
//! the hook, which reads its payload through the [`ObjectDecoder`] helpers.
//!
//! Values the hook does not claim are offered to a [`FallbackSerializer`],
//! which produces an opaque byte payload (tag 60). Anything neither handles
//! is written as null.

use crate::decoder::ObjectDecoder;
use crate::encoder::ObjectEncoder;
use crate::value::Value;
use objpack_core::{ObjPackError, Result};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Payload of an extension value.
///
/// Implemented automatically for any `Debug + PartialEq + Send + Sync`
/// type.
pub trait Payload: Any + fmt::Debug + Send + Sync {
    /// Access as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Compare with another payload of possibly different type.
    fn eq_payload(&self, other: &dyn Payload) -> bool;
}

impl<T: Any + fmt::Debug + PartialEq + Send + Sync> Payload for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_payload(&self, other: &dyn Payload) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }
}

/// A caller-defined value, carried with the tag it encodes under.
#[derive(Debug, Clone)]
pub struct ExtensionValue {
    tag: u8,
    payload: Arc<dyn Payload>,
}

impl ExtensionValue {
    /// Wrap a payload under `tag`.
    pub fn new<P: Payload>(tag: u8, payload: P) -> Self {
        Self {
            tag,
            payload: Arc::new(payload),
        }
    }

    /// The extension tag.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// The payload as a trait object.
    pub fn payload(&self) -> &dyn Payload {
        self.payload.as_ref()
    }

    /// Downcast the payload.
    pub fn downcast_ref<P: Any>(&self) -> Option<&P> {
        self.payload.as_any().downcast_ref::<P>()
    }
}

impl PartialEq for ExtensionValue {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.payload.eq_payload(other.payload.as_ref())
    }
}

/// Customizes encoding and decoding of caller-defined types.
///
/// Every method has a default that leaves the built-in behavior untouched,
/// so a hook only implements what it needs.
pub trait ExtensionHook: Send + Sync {
    /// Substitute a value before it is encoded.
    fn pre_encode<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        Cow::Borrowed(value)
    }

    /// Try to encode `value`. Return `Ok(true)` after writing a tag and
    /// payload, or `Ok(false)` to fall through to built-in encoding.
    fn try_encode(&self, encoder: &mut ObjectEncoder<'_>, value: &Value) -> Result<bool> {
        let _ = (encoder, value);
        Ok(false)
    }

    /// Substitute a value after it has been decoded.
    fn post_decode(&self, value: Value) -> Value {
        value
    }

    /// Try to decode the payload following extension tag `tag`.
    ///
    /// Return `Ok(None)` if the tag is not recognized.
    fn try_decode(&self, decoder: &mut ObjectDecoder<'_>, tag: u8) -> Result<Option<Value>> {
        let _ = (decoder, tag);
        Ok(None)
    }

    /// Error reported for an extension tag nobody claimed.
    fn on_unhandled_tag(&self, tag: u8, offset: usize) -> ObjPackError {
        ObjPackError::unknown_tag(tag, offset)
    }
}

/// Generic byte serialization for values the hook does not claim.
pub trait FallbackSerializer: Send + Sync {
    /// Serialize `value`, or return `None` if it is not supported (the value
    /// is then written as null).
    fn serialize(&self, value: &ExtensionValue) -> Option<Vec<u8>>;

    /// Rebuild a value from a non-empty payload.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;
}
