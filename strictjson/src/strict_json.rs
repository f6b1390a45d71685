//! The mapping engine.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::collections::HashMap;

use serde_json::{Map, Value};
use strictjson_path::JsonPath;

use crate::adapter::{Adapter, ArrayAdapter};
use crate::builder::StrictJsonBuilder;
use crate::construct::Arguments;
use crate::error::{AdapterError, ConfigurationError, ConstructError, Error, JsonFormatError, Result};
use crate::mapped::{FromMapped, Mapped};
use crate::parameter::{ParameterAdapters, ParameterCache, ParameterMetadata, no_constructor};
use crate::suggest::did_you_mean;
use crate::types::{ClassRef, ClassRegistry, TypeDescriptor, TypeKey, TypeKind, ValueKind};

/// Maps JSON onto types that declare how they are constructed.
///
/// An engine is immutable once built. Parameter metadata is cached per type
/// on first use, so sharing one engine (it is `Send + Sync`) is cheaper than
/// building a new one per call.
///
/// ```
/// use strictjson::{Arguments, Construct, ConstructError, Param, StrictJson, TypeDescriptor};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Construct for Point {
///     const NAME: &'static str = "Point";
///
///     fn signature() -> Vec<Param> {
///         vec![
///             Param::new("x", TypeDescriptor::int()),
///             Param::new("y", TypeDescriptor::int()),
///         ]
///     }
///
///     fn construct(mut args: Arguments) -> Result<Self, ConstructError> {
///         Ok(Point { x: args.take("x")?, y: args.take("y")? })
///     }
/// }
///
/// let engine = StrictJson::new();
/// let point: Point = engine.map(r#"{"x": 1, "y": -2}"#).unwrap();
/// assert_eq!((point.x, point.y), (1, -2));
///
/// let err = engine.map::<Point>(r#"{"x": 1, "y": "-2"}"#).unwrap_err();
/// assert_eq!(err.to_string(), "Value is of type string, expected type int at path $.y");
/// ```
pub struct StrictJson {
    type_adapters: HashMap<TypeKey, Arc<dyn Adapter>>,
    classes: ClassRegistry,
    parameters: ParameterCache,
}

impl Default for StrictJson {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StrictJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictJson")
            .field("type_adapters", &self.type_adapters.len())
            .field("classes", &self.classes.len())
            .finish_non_exhaustive()
    }
}

impl StrictJson {
    /// An engine with no adapters and no named classes.
    pub fn new() -> Self {
        StrictJsonBuilder::new().build()
    }

    /// Start configuring an engine.
    pub fn builder() -> StrictJsonBuilder {
        StrictJsonBuilder::new()
    }

    pub(crate) fn from_parts(
        type_adapters: HashMap<TypeKey, Arc<dyn Adapter>>,
        parameter_adapters: ParameterAdapters,
        classes: ClassRegistry,
    ) -> Self {
        Self {
            type_adapters,
            classes,
            parameters: ParameterCache::new(parameter_adapters),
        }
    }

    /// Parse `json` and construct a `T` from it.
    pub fn map<T: crate::Construct>(&self, json: &str) -> Result<T> {
        self.map_as(json, &TypeDescriptor::of_class::<T>())
    }

    /// Parse `json`, map it to `ty`, and convert the result to `T`.
    ///
    /// This is how scalars and adapter-only types are mapped at the root.
    pub fn map_as<T: FromMapped>(&self, json: &str, ty: &TypeDescriptor) -> Result<T> {
        let decoded = safe_decode(json)?;
        let mapped = self.map_decoded(&decoded, ty, &JsonPath::root())?;
        convert_root(mapped)
    }

    /// Parse `json` and map it to the type registered as `type_name`.
    pub fn map_named(&self, json: &str, type_name: &str) -> Result<Mapped> {
        let ty = self.type_named(type_name)?;
        let decoded = safe_decode(json)?;
        self.map_decoded(&decoded, &ty, &JsonPath::root())
    }

    /// Parse a JSON array and construct a `T` from every element, in order.
    pub fn map_to_array_of<T: crate::Construct>(&self, json: &str) -> Result<Vec<T>> {
        self.map_to_array_as(json, &TypeDescriptor::of_class::<T>())
    }

    /// Parse a JSON array and map every element to `element`, in order.
    pub fn map_to_array_as<T: FromMapped>(
        &self,
        json: &str,
        element: &TypeDescriptor,
    ) -> Result<Vec<T>> {
        let decoded = safe_decode(json)?;
        let adapter = ArrayAdapter::new(*element);
        let mapped = self.map_with_adapter(&decoded, &adapter, &JsonPath::root())?;
        convert_root(mapped)
    }

    /// Map an already decoded value found at `path` to `ty`.
    ///
    /// Adapters call this to map nested values.
    pub fn map_decoded(&self, value: &Value, ty: &TypeDescriptor, path: &JsonPath) -> Result<Mapped> {
        if let Some(adapter) = self.type_adapters.get(&ty.key()) {
            trace!(%path, ty = %ty, adapter = adapter.name(), "mapping through type adapter");
            return self.map_with_adapter(value, adapter.as_ref(), path);
        }

        match ty.kind() {
            TypeKind::Scalar(_) => map_scalar(value, ty, path),
            TypeKind::Class(class) => self.map_class(value, ty, class, path),
            TypeKind::Array => Err(ConfigurationError::new(
                "Cannot map to arrays directly, use StrictJson::map_to_array_of()",
                path,
            )
            .into()),
        }
    }

    /// Run `adapter` on `value` after checking that it accepts the value's kind.
    pub fn map_with_adapter(
        &self,
        value: &Value,
        adapter: &dyn Adapter,
        path: &JsonPath,
    ) -> Result<Mapped> {
        let from_types = adapter.from_types();
        if !from_types.iter().any(|ty| ty.allows_value(value)) {
            let expectation = match from_types.as_slice() {
                [] => {
                    return Err(ConfigurationError::new(
                        format!(
                            "Adapter {} does not support any types! (from_types must return a non-empty list)",
                            adapter.name()
                        ),
                        path,
                    )
                    .into());
                }
                [only] => only.to_string(),
                many => {
                    let names: Vec<String> = many.iter().map(ToString::to_string).collect();
                    format!("one of [{}]", names.join(", "))
                }
            };
            return Err(JsonFormatError::new(
                format!(
                    "Expected {expectation}, found {} (using {})",
                    ValueKind::of(value),
                    adapter.name()
                ),
                path,
            )
            .into());
        }

        match adapter.from_json(value, self, path) {
            Ok(mapped) => Ok(mapped),
            Err(AdapterError::Format(err)) => Err(err.into()),
            Err(AdapterError::Other(cause)) => {
                debug!(%path, adapter = adapter.name(), error = %cause, "adapter failed");
                Err(ConfigurationError::new(format!("Adapter {} threw an error", adapter.name()), path)
                    .with_source(cause)
                    .into())
            }
        }
    }

    /// Resolve a type by name: a scalar, `array`, or a registered class.
    pub fn type_named(&self, name: &str) -> Result<TypeDescriptor, ConfigurationError> {
        self.classes.resolve(name).ok_or_else(|| {
            ConfigurationError::new(format!("Type \"{name}\" is not a valid class"), &JsonPath::root())
        })
    }

    /// Constructor parameters of `class` as the engine sees them.
    pub fn parameters(&self, class: &ClassRef) -> Result<Arc<[ParameterMetadata]>, ConfigurationError> {
        self.parameters
            .get_parameters(class, &self.classes, &JsonPath::root())
    }

    fn map_class(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        class: &ClassRef,
        path: &JsonPath,
    ) -> Result<Mapped> {
        let parameters = self.parameters.get_parameters(class, &self.classes, path)?;

        let object = match value {
            Value::Object(object) => object,
            Value::Null if ty.is_nullable() => return Ok(Mapped::Null),
            other => {
                return Err(JsonFormatError::new(
                    format!("Expected object, found {}", ValueKind::of(other)),
                    path,
                )
                .into());
            }
        };

        let arguments = self.collect_arguments(object, class, &parameters, path)?;
        let constructor = class.constructor().ok_or_else(|| no_constructor(class, path))?;

        trace!(%path, class = class.name(), args = %arguments, "constructing");
        let snapshot = arguments.snapshot();
        match (constructor.construct)(arguments) {
            Ok(instance) => Ok(Mapped::Instance(instance)),
            Err(ConstructError::Validation(cause)) => Err(JsonFormatError::new(
                format!(
                    "{}::construct threw a validation error for args {snapshot}",
                    class.name()
                ),
                path,
            )
            .with_source(cause)
            .into()),
            Err(err @ ConstructError::Unexpected(_)) => {
                debug!(%path, class = class.name(), error = %err, "construction failed");
                Err(ConfigurationError::new(
                    format!(
                        "Unable to construct object of type {} with args {snapshot}",
                        class.name()
                    ),
                    path,
                )
                .with_source(err.into_cause())
                .into())
            }
        }
    }

    fn collect_arguments(
        &self,
        object: &Map<String, Value>,
        class: &ClassRef,
        parameters: &[ParameterMetadata],
        path: &JsonPath,
    ) -> Result<Arguments> {
        let mut arguments = Arguments::with_capacity(class.name(), parameters.len());

        for param in parameters {
            let name = param.name();
            let value = if let Some(value) = object.get(name) {
                let param_path = path.with_property(name);
                match param.adapter() {
                    Some(adapter) => self.map_with_adapter(value, adapter, &param_path)?,
                    None => self.map_decoded(value, param.ty(), &param_path)?,
                }
            } else if let Some(default) = param.default_value().produce() {
                default
            } else {
                return Err(JsonFormatError::new(
                    format!(
                        "{}::construct has non-optional parameter named {name} that does not exist in JSON{}",
                        class.name(),
                        did_you_mean(name, object, parameters)
                    ),
                    path,
                )
                .into());
            };
            arguments.push(name, value);
        }

        Ok(arguments)
    }
}

fn map_scalar(value: &Value, ty: &TypeDescriptor, path: &JsonPath) -> Result<Mapped> {
    if ty.allows_value(value) {
        if let Some(mapped) = Mapped::from_scalar(value) {
            return Ok(mapped);
        }
    }
    Err(JsonFormatError::new(
        format!(
            "Value is of type {}, expected type {ty}",
            ValueKind::of(value)
        ),
        path,
    )
    .into())
}

fn safe_decode(json: &str) -> Result<Value, JsonFormatError> {
    serde_json::from_str(json).map_err(|err| {
        JsonFormatError::new(
            format!("Unable to parse invalid JSON ({err}): {json}"),
            &JsonPath::root(),
        )
        .with_source(err)
    })
}

fn convert_root<T: FromMapped>(mapped: Mapped) -> Result<T> {
    let kind = mapped.kind_name();
    T::from_mapped(mapped).map_err(|err| {
        Error::from(
            ConfigurationError::new(
                format!("Unable to convert mapped {kind} to the requested type: {err}"),
                &JsonPath::root(),
            )
            .with_source(err),
        )
    })
}
