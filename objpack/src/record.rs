//! Self-describing user records and the type registry.
//!
//! A record travels as its type name followed by its component values in
//! declaration order. On decode the name is looked up in a [`TypeRegistry`]
//! which turns the components back into a concrete value.
//!
//! # Example
//!
//! ```
//! use objpack::{Record, RecordType, Result, TypeRegistry, Value, ObjPackError};
//! use std::any::Any;
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Record for Point {
//!     fn type_name(&self) -> &str { Self::TYPE_NAME }
//!     fn fields(&self) -> Vec<Value> { vec![Value::Int(self.x), Value::Int(self.y)] }
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! impl RecordType for Point {
//!     const TYPE_NAME: &'static str = "geo.Point";
//!
//!     fn from_fields(fields: Vec<Value>) -> Result<Self> {
//!         match fields.as_slice() {
//!             [Value::Int(x), Value::Int(y)] => Ok(Point { x: *x, y: *y }),
//!             _ => Err(ObjPackError::invalid_record(Self::TYPE_NAME, "expected two ints")),
//!         }
//!     }
//! }
//!
//! let registry = TypeRegistry::new().with::<Point>();
//! assert!(registry.contains("geo.Point"));
//! ```

use crate::value::Value;
use objpack_core::{ObjPackError, Result};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A value that encodes as a named record of component values.
pub trait Record: fmt::Debug + Send + Sync + 'static {
    /// Name written to the stream and used for registry lookup.
    fn type_name(&self) -> &str;

    /// Component values in declaration order.
    fn fields(&self) -> Vec<Value>;

    /// Access as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A record type that can be rebuilt from its components.
pub trait RecordType: Record + Sized {
    /// Registered type name.
    const TYPE_NAME: &'static str;

    /// Rebuild from decoded component values.
    fn from_fields(fields: Vec<Value>) -> Result<Self>;
}

/// A record with no Rust type behind it: just a name and its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    type_name: String,
    fields: Vec<Value>,
}

impl DynamicRecord {
    /// Create a dynamic record.
    pub fn new(type_name: impl Into<String>, fields: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Borrow the component values.
    pub fn field_values(&self) -> &[Value] {
        &self.fields
    }

    /// Take the component values.
    pub fn into_fields(self) -> Vec<Value> {
        self.fields
    }
}

impl Record for DynamicRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> Vec<Value> {
        self.fields.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Constructor turning decoded components into a record.
pub type RecordFactory = Arc<dyn Fn(Vec<Value>) -> Result<Arc<dyn Record>> + Send + Sync>;

/// Map from record type name to constructor.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    factories: HashMap<String, RecordFactory>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`RecordType`] under its `TYPE_NAME`.
    pub fn register<T: RecordType>(&mut self) -> &mut Self {
        self.register_factory(T::TYPE_NAME, |fields| {
            T::from_fields(fields).map(|r| Arc::new(r) as Arc<dyn Record>)
        })
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<T: RecordType>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Register a constructor closure under `name`, replacing any previous one.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Vec<Value>) -> Result<Arc<dyn Record>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Accept `name` and decode it as a [`DynamicRecord`].
    pub fn register_dynamic(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let type_name = name.clone();
        self.register_factory(name, move |fields| {
            Ok(Arc::new(DynamicRecord::new(type_name.clone(), fields)) as Arc<dyn Record>)
        })
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a record from its components.
    pub fn construct(&self, name: &str, fields: Vec<Value>) -> Result<Arc<dyn Record>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ObjPackError::unknown_type(name))?;
        factory(fields)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Celsius(f64);

    impl Record for Celsius {
        fn type_name(&self) -> &str {
            Self::TYPE_NAME
        }

        fn fields(&self) -> Vec<Value> {
            vec![Value::Double(self.0)]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl RecordType for Celsius {
        const TYPE_NAME: &'static str = "units.Celsius";

        fn from_fields(fields: Vec<Value>) -> Result<Self> {
            match fields.as_slice() {
                [Value::Double(v)] => Ok(Self(*v)),
                _ => Err(ObjPackError::invalid_record(Self::TYPE_NAME, "expected one double")),
            }
        }
    }

    #[test]
    fn test_register_and_construct() {
        let registry = TypeRegistry::new().with::<Celsius>();
        let record = registry
            .construct("units.Celsius", vec![Value::Double(21.5)])
            .unwrap();
        assert_eq!(record.type_name(), "units.Celsius");
        assert_eq!(record.as_any().downcast_ref::<Celsius>(), Some(&Celsius(21.5)));
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        let err = registry.construct("nope", Vec::new()).unwrap_err();
        assert!(matches!(err, ObjPackError::UnknownType { name } if name == "nope"));
    }

    #[test]
    fn test_factory_rejects_fields() {
        let registry = TypeRegistry::new().with::<Celsius>();
        let err = registry
            .construct("units.Celsius", vec![Value::Int(1)])
            .unwrap_err();
        assert!(matches!(err, ObjPackError::InvalidRecord { .. }));
    }

    #[test]
    fn test_dynamic_registration() {
        let mut registry = TypeRegistry::new();
        registry.register_dynamic("a.B");
        let record = registry.construct("a.B", vec![Value::Bool(true)]).unwrap();
        let dynamic = record.as_any().downcast_ref::<DynamicRecord>().unwrap();
        assert_eq!(dynamic.field_values(), &[Value::Bool(true)]);
        assert_eq!(registry.names(), vec!["a.B"]);
    }

    #[test]
    fn test_dynamic_record_fields() {
        let record = DynamicRecord::new("a.B", vec![Value::Int(1), Value::from("two")]);
        assert_eq!(record.type_name(), "a.B");
        assert_eq!(record.fields(), record.field_values());
        assert_eq!(record.into_fields(), vec![Value::Int(1), Value::from("two")]);
    }
}
