//! Values produced by the mapping engine.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::construct::Construct;

/// A constructed object with its concrete type erased.
pub struct Instance {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Instance {
    /// Erase `value`, remembering `type_name` for diagnostics.
    pub fn new<T: Any + Send + Sync>(type_name: &'static str, value: T) -> Self {
        Self {
            type_name,
            value: Box::new(value),
        }
    }

    /// Name the instance was created with.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the instance holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recover the value as a `T`, or get the instance back.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { type_name, value }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name)
    }
}

/// The result of mapping one JSON node.
#[derive(Debug)]
pub enum Mapped {
    /// `null`
    Null,
    /// A boolean
    Bool(bool),
    /// An integer
    Int(i64),
    /// A float
    Float(f64),
    /// A string
    String(String),
    /// An ordered sequence, as produced by array adapters
    List(Vec<Mapped>),
    /// A constructed object
    Instance(Instance),
}

impl Mapped {
    /// Wrap a constructed value.
    pub fn instance<T: Construct>(value: T) -> Self {
        Mapped::Instance(Instance::new(T::NAME, value))
    }

    /// Wrap a value of an opaque type, such as one produced by an adapter.
    pub fn opaque<T: Any + Send + Sync>(type_name: &'static str, value: T) -> Self {
        Mapped::Instance(Instance::new(type_name, value))
    }

    /// Kind name used in error messages; instances report their type name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Mapped::Null => "null",
            Mapped::Bool(_) => "bool",
            Mapped::Int(_) => "int",
            Mapped::Float(_) => "float",
            Mapped::String(_) => "string",
            Mapped::List(_) => "array",
            Mapped::Instance(instance) => instance.type_name(),
        }
    }

    /// Whether this is `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Mapped::Null)
    }

    /// The scalar held by a decoded JSON leaf; `None` for arrays and objects.
    pub fn from_scalar(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Mapped::Null),
            Value::Bool(b) => Some(Mapped::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Mapped::Int(i)),
                None => n.as_f64().map(Mapped::Float),
            },
            Value::String(s) => Some(Mapped::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// A copy that renders the same; instances keep only their type name.
    pub(crate) fn snapshot(&self) -> Self {
        match self {
            Mapped::Null => Mapped::Null,
            Mapped::Bool(b) => Mapped::Bool(*b),
            Mapped::Int(i) => Mapped::Int(*i),
            Mapped::Float(f) => Mapped::Float(*f),
            Mapped::String(s) => Mapped::String(s.clone()),
            Mapped::List(items) => Mapped::List(items.iter().map(Mapped::snapshot).collect()),
            Mapped::Instance(instance) => Mapped::Instance(Instance::new(instance.type_name(), ())),
        }
    }
}

impl From<bool> for Mapped {
    fn from(value: bool) -> Self {
        Mapped::Bool(value)
    }
}

impl From<i64> for Mapped {
    fn from(value: i64) -> Self {
        Mapped::Int(value)
    }
}

impl From<f64> for Mapped {
    fn from(value: f64) -> Self {
        Mapped::Float(value)
    }
}

impl From<String> for Mapped {
    fn from(value: String) -> Self {
        Mapped::String(value)
    }
}

impl From<&str> for Mapped {
    fn from(value: &str) -> Self {
        Mapped::String(value.into())
    }
}

impl From<Vec<Mapped>> for Mapped {
    fn from(value: Vec<Mapped>) -> Self {
        Mapped::List(value)
    }
}

impl<T: Into<Mapped>> From<Option<T>> for Mapped {
    fn from(value: Option<T>) -> Self {
        value.map_or(Mapped::Null, Into::into)
    }
}

// Instances have no JSON form; they render as `"<TypeName>"`.
impl Serialize for Mapped {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Mapped::Null => serializer.serialize_unit(),
            Mapped::Bool(b) => serializer.serialize_bool(*b),
            Mapped::Int(i) => serializer.serialize_i64(*i),
            Mapped::Float(f) => serializer.serialize_f64(*f),
            Mapped::String(s) => serializer.serialize_str(s),
            Mapped::List(items) => serializer.collect_seq(items),
            Mapped::Instance(instance) => {
                serializer.serialize_str(&format!("<{}>", instance.type_name()))
            }
        }
    }
}

/// A [`Mapped`] value could not be turned into the requested Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    expected: &'static str,
    found: &'static str,
}

impl ConversionError {
    /// `expected` was asked for, `found` was there.
    pub const fn new(expected: &'static str, found: &'static str) -> Self {
        Self { expected, found }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl core::error::Error for ConversionError {}

/// Conversion out of a [`Mapped`] value.
pub trait FromMapped: Sized {
    /// Convert, failing if `value` holds something else.
    fn from_mapped(value: Mapped) -> Result<Self, ConversionError>;
}

impl FromMapped for Mapped {
    fn from_mapped(value: Mapped) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

macro_rules! impl_from_mapped {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromMapped for $ty {
            fn from_mapped(value: Mapped) -> Result<Self, ConversionError> {
                match value {
                    Mapped::$variant(v) => Ok(v),
                    other => Err(ConversionError::new($expected, other.kind_name())),
                }
            }
        }
    };
}

impl_from_mapped!(bool, Bool, "bool");
impl_from_mapped!(i64, Int, "int");
impl_from_mapped!(f64, Float, "float");
impl_from_mapped!(String, String, "string");

impl<T: FromMapped> FromMapped for Option<T> {
    fn from_mapped(value: Mapped) -> Result<Self, ConversionError> {
        match value {
            Mapped::Null => Ok(None),
            other => T::from_mapped(other).map(Some),
        }
    }
}

impl<T: FromMapped> FromMapped for Vec<T> {
    fn from_mapped(value: Mapped) -> Result<Self, ConversionError> {
        match value {
            Mapped::List(items) => items.into_iter().map(T::from_mapped).collect(),
            other => Err(ConversionError::new("array", other.kind_name())),
        }
    }
}

impl<T: Construct> FromMapped for T {
    fn from_mapped(value: Mapped) -> Result<Self, ConversionError> {
        match value {
            Mapped::Instance(instance) => instance
                .downcast::<T>()
                .map_err(|instance| ConversionError::new(T::NAME, instance.type_name())),
            other => Err(ConversionError::new(T::NAME, other.kind_name())),
        }
    }
}
