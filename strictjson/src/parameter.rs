//! Constructor parameter metadata and its per-type cache.
//!
//! Metadata is computed the first time a class is mapped and kept for the
//! lifetime of the engine. Target types do not change while the program runs,
//! so entries are never invalidated.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use strictjson_path::JsonPath;

use crate::adapter::Adapter;
use crate::construct::DefaultValue;
use crate::error::ConfigurationError;
use crate::types::{ClassRef, ClassRegistry, TypeDescriptor};

/// Parameter-level adapters, by class and parameter name.
pub(crate) type ParameterAdapters = HashMap<TypeId, HashMap<String, Arc<dyn Adapter>>>;

/// Everything the engine needs to know about one constructor parameter.
#[derive(Clone)]
pub struct ParameterMetadata {
    name: &'static str,
    ty: TypeDescriptor,
    default: DefaultValue,
    adapter: Option<Arc<dyn Adapter>>,
}

impl ParameterMetadata {
    /// Parameter name, which is also the JSON key.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Resolved type.
    pub const fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Default used when the key is absent.
    pub const fn default_value(&self) -> DefaultValue {
        self.default
    }

    /// Whether the key may be omitted.
    pub const fn has_default(&self) -> bool {
        self.default.is_present()
    }

    /// Adapter registered for this parameter, if any.
    pub fn adapter(&self) -> Option<&dyn Adapter> {
        self.adapter.as_deref()
    }
}

impl fmt::Debug for ParameterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterMetadata")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("default", &self.default)
            .field("adapter", &self.adapter.as_ref().map(|a| a.name()))
            .finish()
    }
}

pub(crate) fn no_constructor(class: &ClassRef, path: &JsonPath) -> ConfigurationError {
    ConfigurationError::new(
        format!("Type {} does not have a valid constructor", class.name()),
        path,
    )
}

/// Lazily filled map from class to its ordered parameter metadata.
pub(crate) struct ParameterCache {
    entries: RwLock<HashMap<TypeId, Arc<[ParameterMetadata]>>>,
    adapters: ParameterAdapters,
}

impl ParameterCache {
    pub(crate) fn new(adapters: ParameterAdapters) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            adapters,
        }
    }

    /// Parameters of `class` in declaration order, computing them on first use.
    pub(crate) fn get_parameters(
        &self,
        class: &ClassRef,
        registry: &ClassRegistry,
        path: &JsonPath,
    ) -> Result<Arc<[ParameterMetadata]>, ConfigurationError> {
        // Fast path: read lock only
        if let Some(params) = self.entries.read().get(&class.type_id()) {
            return Ok(Arc::clone(params));
        }

        debug!(class = class.name(), "resolving constructor parameters");
        let params: Arc<[ParameterMetadata]> = self.find_parameters(class, registry, path)?.into();

        // Another caller may have raced us here; both computed the same list.
        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(class.type_id()).or_insert(params)))
    }

    fn find_parameters(
        &self,
        class: &ClassRef,
        registry: &ClassRegistry,
        path: &JsonPath,
    ) -> Result<Vec<ParameterMetadata>, ConfigurationError> {
        let constructor = class
            .constructor()
            .ok_or_else(|| no_constructor(class, path))?;
        let adapters = self.adapters.get(&class.type_id());

        let signature = (constructor.signature)();
        let mut seen = HashSet::with_capacity(signature.len());
        let mut parameters = Vec::with_capacity(signature.len());

        for param in signature {
            let name = param.name();
            if !seen.insert(name) {
                return Err(ConfigurationError::new(
                    format!(
                        "{}::construct declares parameter {name} more than once",
                        class.name()
                    ),
                    path,
                ));
            }

            let ty = TypeDescriptor::from_parameter(&param, class.name(), registry, path)?;
            let adapter = adapters.and_then(|by_name| by_name.get(name)).cloned();

            // Caught here rather than at decode time so the message can name
            // the remedy.
            if ty.is_array() && adapter.is_none() {
                return Err(ConfigurationError::new(
                    format!(
                        "{}::construct has parameter named {name} of type array with no parameter adapter\n\
                         (Use StrictJson::builder().add_parameter_array_adapter(...) to register an array adapter for this class)",
                        class.name()
                    ),
                    path,
                ));
            }

            trace!(class = class.name(), parameter = name, ty = %ty, "resolved parameter");
            parameters.push(ParameterMetadata {
                name,
                ty,
                default: param.default_value(),
                adapter,
            });
        }

        Ok(parameters)
    }

    #[cfg(test)]
    pub(crate) fn cached_len(&self) -> usize {
        self.entries.read().len()
    }
}
