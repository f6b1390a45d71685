//! Fluent configuration for [`StrictJson`].

use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;
use std::collections::HashMap;

use crate::adapter::{Adapter, ArrayAdapter};
use crate::construct::Construct;
use crate::parameter::ParameterAdapters;
use crate::strict_json::StrictJson;
use crate::types::{ClassRegistry, TypeDescriptor, TypeKey};

/// Collects adapters and named classes, then builds a [`StrictJson`].
///
/// Registering twice for the same slot keeps the later registration.
#[derive(Default)]
pub struct StrictJsonBuilder {
    type_adapters: HashMap<TypeKey, Arc<dyn Adapter>>,
    parameter_adapters: ParameterAdapters,
    classes: ClassRegistry,
}

impl fmt::Debug for StrictJsonBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictJsonBuilder")
            .field("type_adapters", &self.type_adapters.len())
            .field("parameter_adapters", &self.parameter_adapters.len())
            .field("classes", &self.classes)
            .finish()
    }
}

impl StrictJsonBuilder {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every value of type `ty` through `adapter`, wherever it appears.
    ///
    /// Nullability of `ty` is ignored: `int` and `?int` share one slot.
    pub fn add_type_adapter(mut self, ty: TypeDescriptor, adapter: impl Adapter + 'static) -> Self {
        self.type_adapters.insert(ty.key(), Arc::new(adapter));
        self
    }

    /// Map every value of type `T` through `adapter`, wherever it appears.
    ///
    /// `T` needs no [`Construct`] impl, which makes this the way to map
    /// foreign types such as dates.
    pub fn add_class_adapter<T: Any + Send + Sync>(mut self, adapter: impl Adapter + 'static) -> Self {
        self.type_adapters
            .insert(TypeKey::Class(TypeId::of::<T>()), Arc::new(adapter));
        self
    }

    /// Map the `parameter` argument of `T`'s constructor through `adapter`.
    pub fn add_parameter_adapter<T: Construct>(
        mut self,
        parameter: impl Into<String>,
        adapter: impl Adapter + 'static,
    ) -> Self {
        self.parameter_adapters
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(parameter.into(), Arc::new(adapter));
        self
    }

    /// Map the `parameter` argument of `T`'s constructor as a list of `element`.
    pub fn add_parameter_array_adapter<T: Construct>(
        self,
        parameter: impl Into<String>,
        element: TypeDescriptor,
    ) -> Self {
        self.add_parameter_adapter::<T>(parameter, ArrayAdapter::new(element))
    }

    /// Make `T` resolvable by [`Construct::NAME`], both for
    /// [`StrictJson::type_named`] and for parameters declared with
    /// [`Param::named`](crate::Param::named).
    ///
    /// A name registered twice, by either this or
    /// [`register_opaque`](Self::register_opaque), resolves to the later type.
    pub fn register_class<T: Construct>(mut self) -> Self {
        self.register(TypeDescriptor::of_class::<T>());
        self
    }

    /// Make a type without a constructor resolvable by `name`.
    ///
    /// Such a type can only be mapped through an adapter. As with
    /// [`register_class`](Self::register_class), the later of two
    /// registrations under one name wins.
    pub fn register_opaque<T: Any + Send + Sync>(mut self, name: &'static str) -> Self {
        self.register(TypeDescriptor::opaque::<T>(name));
        self
    }

    fn register(&mut self, ty: TypeDescriptor) {
        if self.classes.insert(ty).is_some() {
            debug!(name = ty.name(), "class name registered again, replacing the earlier type");
        }
    }

    /// Finish configuration.
    pub fn build(self) -> StrictJson {
        StrictJson::from_parts(self.type_adapters, self.parameter_adapters, self.classes)
    }
}
