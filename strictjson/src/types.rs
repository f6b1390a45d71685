//! Type descriptors: what shape a mapped value is expected to have.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::HashMap;

use serde_json::Value;
use strictjson_path::JsonPath;

use crate::construct::{Arguments, Construct, DeclaredType, Param, construct_erased};
use crate::error::{ConfigurationError, ConstructError};
use crate::mapped::Instance;

/// The runtime kind of a decoded JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// A number representable as an `i64`
    Int,
    /// Any other number
    Float,
    /// A string
    String,
    /// An array
    Array,
    /// An object
    Object,
}

impl ValueKind {
    /// Classify a decoded value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.as_i64().is_some() => ValueKind::Int,
            Value::Number(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar kinds a JSON leaf can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
}

impl Scalar {
    /// Name used in error messages and by [`ClassRegistry::resolve`].
    pub const fn name(self) -> &'static str {
        match self {
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::Bool => "bool",
            Scalar::String => "string",
        }
    }

    /// Look up a scalar by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Scalar::Int),
            "float" => Some(Scalar::Float),
            "bool" => Some(Scalar::Bool),
            "string" => Some(Scalar::String),
            _ => None,
        }
    }

    const fn value_kind(self) -> ValueKind {
        match self {
            Scalar::Int => ValueKind::Int,
            Scalar::Float => ValueKind::Float,
            Scalar::Bool => ValueKind::Bool,
            Scalar::String => ValueKind::String,
        }
    }
}

/// Erased constructor of a [`Construct`] type.
#[derive(Clone, Copy)]
pub(crate) struct Constructor {
    pub(crate) signature: fn() -> Vec<Param>,
    pub(crate) construct: fn(Arguments) -> Result<Instance, ConstructError>,
}

/// Identity of a class-kind target type.
///
/// Two class references are equal when they name the same Rust type. A class
/// created with [`TypeDescriptor::opaque`] has no constructor and can only be
/// mapped through a registered adapter.
#[derive(Clone, Copy)]
pub struct ClassRef {
    name: &'static str,
    type_id: TypeId,
    constructor: Option<Constructor>,
}

impl ClassRef {
    /// Display name of the class.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Rust type identity of the class.
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether the engine can build this class from a JSON object.
    pub const fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    pub(crate) const fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassRef").field(&self.name).finish()
    }
}

/// The kind part of a [`TypeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A JSON leaf
    Scalar(Scalar),
    /// A JSON array; only mappable through an adapter
    Array,
    /// An object built from a JSON object
    Class(ClassRef),
}

/// Key under which type-level adapters are registered. Nullability is not
/// part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TypeKey {
    Scalar(Scalar),
    Array,
    Class(TypeId),
}

/// Description of an expected shape: a kind plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    kind: TypeKind,
    nullable: bool,
}

impl TypeDescriptor {
    const fn scalar(scalar: Scalar) -> Self {
        Self {
            kind: TypeKind::Scalar(scalar),
            nullable: false,
        }
    }

    /// An integer.
    pub const fn int() -> Self {
        Self::scalar(Scalar::Int)
    }

    /// A float. Integers are not accepted.
    pub const fn float() -> Self {
        Self::scalar(Scalar::Float)
    }

    /// A boolean.
    pub const fn bool() -> Self {
        Self::scalar(Scalar::Bool)
    }

    /// A string.
    pub const fn string() -> Self {
        Self::scalar(Scalar::String)
    }

    /// An array.
    pub const fn array() -> Self {
        Self {
            kind: TypeKind::Array,
            nullable: false,
        }
    }

    /// A class the engine can construct.
    pub fn of_class<T: Construct>() -> Self {
        Self {
            kind: TypeKind::Class(ClassRef {
                name: T::NAME,
                type_id: TypeId::of::<T>(),
                constructor: Some(Constructor {
                    signature: T::signature,
                    construct: construct_erased::<T>,
                }),
            }),
            nullable: false,
        }
    }

    /// A class with no usable constructor, such as a date type from another
    /// crate. It can be named in signatures but only an adapter can produce it.
    pub fn opaque<T: Any + Send + Sync>(name: &'static str) -> Self {
        Self {
            kind: TypeKind::Class(ClassRef {
                name,
                type_id: TypeId::of::<T>(),
                constructor: None,
            }),
            nullable: false,
        }
    }

    /// Resolve the declared type of a constructor parameter of `owner`.
    pub fn from_parameter(
        param: &Param,
        owner: &str,
        registry: &ClassRegistry,
        path: &JsonPath,
    ) -> Result<Self, ConfigurationError> {
        match param.declared_type() {
            DeclaredType::Descriptor(ty) => Ok(ty),
            DeclaredType::Named { name, nullable } => match registry.resolve(name) {
                Some(ty) if nullable => Ok(ty.as_nullable()),
                Some(ty) => Ok(ty),
                None => Err(ConfigurationError::new(
                    format!(
                        "Unsupported type {name} for parameter {} of {owner}",
                        param.name()
                    ),
                    path,
                )),
            },
            DeclaredType::Unspecified => Err(ConfigurationError::new(
                format!(
                    "{owner}::construct has parameter named {} with no specified type",
                    param.name()
                ),
                path,
            )),
        }
    }

    /// A copy that also accepts `null`.
    #[must_use]
    pub const fn as_nullable(self) -> Self {
        Self {
            kind: self.kind,
            nullable: true,
        }
    }

    /// The kind of this descriptor.
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Whether `null` is accepted.
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether this is a scalar kind.
    pub const fn is_scalar(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar(_))
    }

    /// Whether this is the array kind.
    pub const fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array)
    }

    /// Whether this is a class kind.
    pub const fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class(_))
    }

    /// The class, for class kinds.
    pub const fn class(&self) -> Option<&ClassRef> {
        match &self.kind {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Type name without the nullability marker.
    pub const fn name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Scalar(scalar) => scalar.name(),
            TypeKind::Array => "array",
            TypeKind::Class(class) => class.name,
        }
    }

    pub(crate) fn key(&self) -> TypeKey {
        match &self.kind {
            TypeKind::Scalar(scalar) => TypeKey::Scalar(*scalar),
            TypeKind::Array => TypeKey::Array,
            TypeKind::Class(class) => TypeKey::Class(class.type_id),
        }
    }

    /// Whether a parameter of this type would accept `value`.
    ///
    /// Class kinds accept JSON objects, the decoded form of a class instance.
    pub fn allows_value(&self, value: &Value) -> bool {
        let kind = ValueKind::of(value);
        if kind == ValueKind::Null {
            return self.nullable;
        }
        match &self.kind {
            TypeKind::Scalar(scalar) => scalar.value_kind() == kind,
            TypeKind::Array => kind == ValueKind::Array,
            TypeKind::Class(_) => kind == ValueKind::Object,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("?")?;
        }
        f.write_str(self.name())
    }
}

/// Classes that can be referred to by name.
///
/// Names resolve to scalars (`int`, `float`, `bool`, `string`), `array`, or a
/// registered class. A leading `?` makes the result nullable.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, TypeDescriptor>,
}

impl ClassRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ty` resolvable under its own name.
    ///
    /// Names are unique: inserting a second type under a name already taken
    /// replaces the first, which is returned.
    pub fn insert(&mut self, ty: TypeDescriptor) -> Option<TypeDescriptor> {
        self.classes.insert(ty.name().into(), ty)
    }

    /// Resolve a type name.
    pub fn resolve(&self, name: &str) -> Option<TypeDescriptor> {
        if let Some(inner) = name.strip_prefix('?') {
            return self.resolve(inner).map(TypeDescriptor::as_nullable);
        }
        if let Some(scalar) = Scalar::from_name(name) {
            return Some(TypeDescriptor::scalar(scalar));
        }
        if name == "array" {
            return Some(TypeDescriptor::array());
        }
        self.classes.get(name).copied()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
