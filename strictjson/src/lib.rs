#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

mod adapter;
mod builder;
mod construct;
mod error;
mod mapped;
mod parameter;
mod strict_json;
mod suggest;
mod types;

pub use adapter::{Adapter, ArrayAdapter, FnAdapter};
pub use builder::StrictJsonBuilder;
pub use construct::{Arguments, Construct, DeclaredType, DefaultValue, Param};
pub use error::{
    AdapterError, BoxError, ConfigurationError, ConstructError, Error, JsonFormatError, Result,
};
pub use mapped::{ConversionError, FromMapped, Instance, Mapped};
pub use parameter::ParameterMetadata;
pub use strict_json::StrictJson;
pub use types::{ClassRef, ClassRegistry, Scalar, TypeDescriptor, TypeKind, ValueKind};

// The decoded tree and paths appear in adapter signatures.
pub use serde_json::Value;
pub use strictjson_path::{JsonPath, PathStep};
