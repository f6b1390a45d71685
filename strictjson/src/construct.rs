//! Explicit constructor signatures.
//!
//! A type becomes a mapping target by implementing [`Construct`]: it lists its
//! constructor parameters in order, and builds itself from the resolved
//! [`Arguments`].
//!
//! ```
//! use strictjson::{Arguments, Construct, ConstructError, Param, TypeDescriptor};
//!
//! struct Address {
//!     street: String,
//!     zip_code: String,
//! }
//!
//! impl Construct for Address {
//!     const NAME: &'static str = "Address";
//!
//!     fn signature() -> Vec<Param> {
//!         vec![
//!             Param::new("street", TypeDescriptor::string()),
//!             Param::new("zip_code", TypeDescriptor::string()),
//!         ]
//!     }
//!
//!     fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
//!         Ok(Address {
//!             street: args.take("street")?,
//!             zip_code: args.take("zip_code")?,
//!         })
//!     }
//! }
//! ```

use alloc::format;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::ConstructError;
use crate::mapped::{FromMapped, Instance, Mapped};
use crate::types::TypeDescriptor;

/// A type the engine can build from a JSON object.
pub trait Construct: Sized + Send + Sync + 'static {
    /// Name used in error messages and for lookups by name.
    const NAME: &'static str;

    /// Constructor parameters, in declaration order.
    fn signature() -> Vec<Param>;

    /// Build a value from arguments matching [`signature`](Self::signature).
    ///
    /// Return [`ConstructError::Validation`] to reject well-typed but invalid
    /// input; the caller sees it as a data error.
    fn construct(args: Arguments) -> Result<Self, ConstructError>;
}

pub(crate) fn construct_erased<T: Construct>(args: Arguments) -> Result<Instance, ConstructError> {
    T::construct(args).map(|value| Instance::new(T::NAME, value))
}

/// How a parameter's type is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    /// A fully resolved type
    Descriptor(TypeDescriptor),
    /// A type name, resolved against the engine's class registry
    Named {
        /// Type name
        name: &'static str,
        /// Whether `null` is accepted
        nullable: bool,
    },
    /// No type at all; mapping such a parameter is a configuration error
    Unspecified,
}

/// What to use when a parameter's key is absent from the JSON object.
///
/// `Null` and `NoDefault` are different: a parameter defaulting to `null`
/// can be omitted, one without a default cannot.
#[derive(Debug, Clone, Copy, Default)]
pub enum DefaultValue {
    /// The key is required
    #[default]
    NoDefault,
    /// The key may be omitted; the argument is `null`
    Null,
    /// The key may be omitted; the argument is produced by the function
    Value(fn() -> Mapped),
}

impl DefaultValue {
    /// Whether the key may be omitted.
    pub const fn is_present(&self) -> bool {
        !matches!(self, DefaultValue::NoDefault)
    }

    /// The default argument, if there is one.
    pub fn produce(&self) -> Option<Mapped> {
        match self {
            DefaultValue::NoDefault => None,
            DefaultValue::Null => Some(Mapped::Null),
            DefaultValue::Value(make) => Some(make()),
        }
    }
}

/// One declared constructor parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    name: &'static str,
    declared: DeclaredType,
    default: DefaultValue,
}

impl Param {
    /// A required parameter of the given type.
    pub const fn new(name: &'static str, ty: TypeDescriptor) -> Self {
        Self {
            name,
            declared: DeclaredType::Descriptor(ty),
            default: DefaultValue::NoDefault,
        }
    }

    /// A required parameter whose type is looked up by name when the
    /// signature is first used.
    pub const fn named(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            declared: DeclaredType::Named {
                name: type_name,
                nullable: false,
            },
            default: DefaultValue::NoDefault,
        }
    }

    /// A parameter without a type.
    pub const fn untyped(name: &'static str) -> Self {
        Self {
            name,
            declared: DeclaredType::Unspecified,
            default: DefaultValue::NoDefault,
        }
    }

    /// Accept `null` as well.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.declared = match self.declared {
            DeclaredType::Descriptor(ty) => DeclaredType::Descriptor(ty.as_nullable()),
            DeclaredType::Named { name, .. } => DeclaredType::Named {
                name,
                nullable: true,
            },
            DeclaredType::Unspecified => DeclaredType::Unspecified,
        };
        self
    }

    /// Default to `null` when the key is absent.
    #[must_use]
    pub const fn default_null(mut self) -> Self {
        self.default = DefaultValue::Null;
        self
    }

    /// Default to `make()` when the key is absent.
    #[must_use]
    pub const fn with_default(mut self, make: fn() -> Mapped) -> Self {
        self.default = DefaultValue::Value(make);
        self
    }

    /// Parameter name, which is also the JSON key.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type.
    pub const fn declared_type(&self) -> DeclaredType {
        self.declared
    }

    /// The default.
    pub const fn default_value(&self) -> DefaultValue {
        self.default
    }
}

/// The resolved arguments for one constructor call, in parameter order.
pub struct Arguments {
    type_name: &'static str,
    values: Vec<(&'static str, Option<Mapped>)>,
}

impl Arguments {
    /// Empty argument list for `type_name`.
    pub fn new(type_name: &'static str) -> Self {
        Self::with_capacity(type_name, 0)
    }

    /// Empty argument list with room for `capacity` arguments.
    pub fn with_capacity(type_name: &'static str, capacity: usize) -> Self {
        Self {
            type_name,
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append an argument.
    pub fn push(&mut self, name: &'static str, value: Mapped) {
        self.values.push((name, Some(value)));
    }

    /// Append an argument, builder style.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<Mapped>) -> Self {
        self.push(name, value.into());
        self
    }

    /// Name of the type being constructed.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of arguments, taken or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look at an argument without taking it.
    pub fn get(&self, name: &str) -> Option<&Mapped> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| value.as_ref())
    }

    fn take_mapped(&mut self, name: &str) -> Result<Mapped, ConstructError> {
        self.values
            .iter_mut()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| value.take())
            .ok_or_else(|| {
                ConstructError::unexpected(format!(
                    "{}: no argument named `{name}`",
                    self.type_name
                ))
            })
    }

    /// Move an argument out, converted to `T`.
    ///
    /// A missing argument or one of the wrong type is an unexpected failure:
    /// the engine only hands over values matching the signature.
    pub fn take<T: FromMapped>(&mut self, name: &str) -> Result<T, ConstructError> {
        let value = self.take_mapped(name)?;
        T::from_mapped(value).map_err(|e| {
            ConstructError::unexpected(format!("{}: argument `{name}`: {e}", self.type_name))
        })
    }

    /// Move out an argument produced by an adapter for an opaque type.
    pub fn take_instance<T: Any>(&mut self, name: &str) -> Result<T, ConstructError> {
        match self.take_mapped(name)? {
            Mapped::Instance(instance) => instance.downcast::<T>().map_err(|instance| {
                ConstructError::unexpected(format!(
                    "{}: argument `{name}`: expected {}, found {}",
                    self.type_name,
                    core::any::type_name::<T>(),
                    instance.type_name()
                ))
            }),
            other => Err(ConstructError::unexpected(format!(
                "{}: argument `{name}`: expected {}, found {}",
                self.type_name,
                core::any::type_name::<T>(),
                other.kind_name()
            ))),
        }
    }

    /// A copy of the argument list for error messages, taken before the
    /// constructor consumes the original.
    pub(crate) fn snapshot(&self) -> Self {
        Self {
            type_name: self.type_name,
            values: self
                .values
                .iter()
                .map(|(name, value)| (*name, value.as_ref().map(Mapped::snapshot)))
                .collect(),
        }
    }

    /// Arguments in parameter order; taken ones are `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&Mapped>)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value.as_ref()))
    }
}

impl Serialize for Arguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for (_, value) in &self.values {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Renders the argument values as a JSON array.
impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("type_name", &self.type_name)
            .field("values", &self.values)
            .finish()
    }
}
