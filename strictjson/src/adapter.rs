//! Custom conversions from decoded JSON to mapped values.
//!
//! An adapter declares which JSON kinds it accepts through
//! [`Adapter::from_types`]. The engine checks the value against that list
//! before calling [`Adapter::from_json`], so an adapter only ever sees the
//! shapes it asked for.

use alloc::vec::Vec;
use core::fmt;

use serde_json::Value;
use strictjson_path::JsonPath;

use crate::error::{AdapterError, JsonFormatError};
use crate::mapped::Mapped;
use crate::strict_json::StrictJson;
use crate::types::{TypeDescriptor, ValueKind};

/// A user-supplied conversion.
///
/// Adapters are registered through [`StrictJsonBuilder`](crate::StrictJsonBuilder)
/// either for a whole target type or for a single constructor parameter.
///
/// ```
/// use strictjson::{Adapter, AdapterError, JsonPath, Mapped, StrictJson, TypeDescriptor, Value};
///
/// struct Uppercase;
///
/// impl Adapter for Uppercase {
///     fn from_types(&self) -> Vec<TypeDescriptor> {
///         vec![TypeDescriptor::string()]
///     }
///
///     fn from_json(&self, value: &Value, _: &StrictJson, _: &JsonPath) -> Result<Mapped, AdapterError> {
///         Ok(Mapped::from(value.as_str().unwrap_or_default().to_uppercase()))
///     }
/// }
///
/// let engine = StrictJson::builder()
///     .add_type_adapter(TypeDescriptor::string(), Uppercase)
///     .build();
/// let shouted: String = engine.map_as(r#""quiet""#, &TypeDescriptor::string()).unwrap();
/// assert_eq!(shouted, "QUIET");
/// ```
pub trait Adapter: Send + Sync {
    /// Accepted JSON kinds. Must not be empty.
    fn from_types(&self) -> Vec<TypeDescriptor>;

    /// Convert `value`, which already matches one of [`Adapter::from_types`].
    ///
    /// `engine` may be used to map nested values; `path` is where `value`
    /// sits in the document.
    fn from_json(
        &self,
        value: &Value,
        engine: &StrictJson,
        path: &JsonPath,
    ) -> Result<Mapped, AdapterError>;

    /// Name used in error messages.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

/// Maps every element of a JSON array to `element`.
///
/// This is the adapter installed by
/// [`add_parameter_array_adapter`](crate::StrictJsonBuilder::add_parameter_array_adapter).
#[derive(Debug, Clone, Copy)]
pub struct ArrayAdapter {
    element: TypeDescriptor,
}

impl ArrayAdapter {
    /// Adapter producing a list of `element` values.
    pub const fn new(element: TypeDescriptor) -> Self {
        Self { element }
    }

    /// Element type.
    pub const fn element(&self) -> &TypeDescriptor {
        &self.element
    }
}

impl Adapter for ArrayAdapter {
    fn from_types(&self) -> Vec<TypeDescriptor> {
        alloc::vec![TypeDescriptor::array()]
    }

    fn from_json(
        &self,
        value: &Value,
        engine: &StrictJson,
        path: &JsonPath,
    ) -> Result<Mapped, AdapterError> {
        let Value::Array(items) = value else {
            return Err(JsonFormatError::new(
                alloc::format!("Expected array, found {}", ValueKind::of(value)),
                path,
            )
            .into());
        };

        let mut mapped = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            mapped.push(engine.map_decoded(item, &self.element, &path.with_array_index(index))?);
        }
        Ok(Mapped::List(mapped))
    }

    fn name(&self) -> &str {
        "ArrayAdapter"
    }
}

/// An adapter built from a closure.
pub struct FnAdapter<F> {
    name: &'static str,
    from_types: Vec<TypeDescriptor>,
    convert: F,
}

impl<F> FnAdapter<F> {
    /// Adapter named `name` accepting `from_types` and converting with `convert`.
    pub fn new(name: &'static str, from_types: Vec<TypeDescriptor>, convert: F) -> Self
    where
        F: Fn(&Value, &StrictJson, &JsonPath) -> Result<Mapped, AdapterError> + Send + Sync,
    {
        Self {
            name,
            from_types,
            convert,
        }
    }
}

impl<F> fmt::Debug for FnAdapter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAdapter")
            .field("name", &self.name)
            .field("from_types", &self.from_types)
            .finish_non_exhaustive()
    }
}

impl<F> Adapter for FnAdapter<F>
where
    F: Fn(&Value, &StrictJson, &JsonPath) -> Result<Mapped, AdapterError> + Send + Sync,
{
    fn from_types(&self) -> Vec<TypeDescriptor> {
        self.from_types.clone()
    }

    fn from_json(
        &self,
        value: &Value,
        engine: &StrictJson,
        path: &JsonPath,
    ) -> Result<Mapped, AdapterError> {
        (self.convert)(value, engine, path)
    }

    fn name(&self) -> &str {
        self.name
    }
}
