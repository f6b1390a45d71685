//! Error types for mapping.
//!
//! Every failure is one of two kinds. A [`JsonFormatError`] means the input
//! does not have the requested shape; fixing the input fixes the error. A
//! [`ConfigurationError`] means the mapping setup itself is broken (an unknown
//! type, a parameter nothing can map, an adapter or constructor failing in an
//! unexpected way). Callers can tell the two apart by kind alone.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::{self, Display};

use strictjson_path::JsonPath;

/// A boxed error used as the underlying cause of mapping errors.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Result type used throughout strictjson.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The input JSON does not conform to the requested shape.
#[derive(Debug)]
pub struct JsonFormatError {
    message: String,
    path: JsonPath,
    source: Option<BoxError>,
}

/// The mapping setup is invalid.
#[derive(Debug)]
pub struct ConfigurationError {
    message: String,
    path: JsonPath,
    source: Option<BoxError>,
}

macro_rules! impl_path_error {
    ($ty:ident) => {
        impl $ty {
            /// Create an error detected at `path`.
            pub fn new(message: impl Into<String>, path: &JsonPath) -> Self {
                Self {
                    message: message.into(),
                    path: path.clone(),
                    source: None,
                }
            }

            /// Attach the underlying cause.
            #[must_use]
            pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
                self.source = Some(source.into());
                self
            }

            /// The message, without the path suffix.
            pub fn message(&self) -> &str {
                &self.message
            }

            /// Where in the document the problem was detected.
            pub fn path(&self) -> &JsonPath {
                &self.path
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} at path {}", self.message, self.path)
            }
        }

        impl core::error::Error for $ty {
            fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
                self.source
                    .as_deref()
                    .map(|e| e as &(dyn core::error::Error + 'static))
            }
        }
    };
}

impl_path_error!(JsonFormatError);
impl_path_error!(ConfigurationError);

/// Any failure returned by the mapping engine.
#[derive(Debug)]
pub enum Error {
    /// The input JSON does not have the requested shape
    JsonFormat(JsonFormatError),
    /// The mapping setup is invalid
    Configuration(ConfigurationError),
}

impl Error {
    /// The message, without the path suffix.
    pub fn message(&self) -> &str {
        match self {
            Error::JsonFormat(e) => e.message(),
            Error::Configuration(e) => e.message(),
        }
    }

    /// Where in the document the problem was detected.
    pub fn path(&self) -> &JsonPath {
        match self {
            Error::JsonFormat(e) => e.path(),
            Error::Configuration(e) => e.path(),
        }
    }

    /// Whether the input was at fault.
    pub const fn is_json_format(&self) -> bool {
        matches!(self, Error::JsonFormat(_))
    }

    /// Whether the setup was at fault.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::JsonFormat(e) => Display::fmt(e, f),
            Error::Configuration(e) => Display::fmt(e, f),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::JsonFormat(e) => core::error::Error::source(e),
            Error::Configuration(e) => core::error::Error::source(e),
        }
    }
}

impl From<JsonFormatError> for Error {
    fn from(err: JsonFormatError) -> Self {
        Error::JsonFormat(err)
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Error::Configuration(err)
    }
}

/// Failure returned by [`Adapter::from_json`](crate::Adapter::from_json).
///
/// Only [`AdapterError::Format`] reaches the caller unchanged. Anything else
/// is reported as a [`ConfigurationError`] naming the adapter.
#[derive(Debug)]
pub enum AdapterError {
    /// The value handed to the adapter has the wrong shape
    Format(JsonFormatError),
    /// The adapter failed for a reason unrelated to the input
    Other(BoxError),
}

impl AdapterError {
    /// Wrap an arbitrary failure.
    pub fn other(err: impl Into<BoxError>) -> Self {
        AdapterError::Other(err.into())
    }
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::Format(e) => Display::fmt(e, f),
            AdapterError::Other(e) => Display::fmt(e, f),
        }
    }
}

impl core::error::Error for AdapterError {}

impl From<JsonFormatError> for AdapterError {
    fn from(err: JsonFormatError) -> Self {
        AdapterError::Format(err)
    }
}

// A delegated call that hit a setup problem is not a data problem.
impl From<Error> for AdapterError {
    fn from(err: Error) -> Self {
        match err {
            Error::JsonFormat(e) => AdapterError::Format(e),
            Error::Configuration(e) => AdapterError::Other(Box::new(e)),
        }
    }
}

/// Failure returned by [`Construct::construct`](crate::Construct::construct).
#[derive(Debug)]
pub enum ConstructError {
    /// The type rejected its arguments as invalid input
    Validation(BoxError),
    /// Construction failed for any other reason
    Unexpected(BoxError),
}

impl ConstructError {
    /// The arguments were well-typed but not acceptable.
    pub fn validation(err: impl Into<BoxError>) -> Self {
        ConstructError::Validation(err.into())
    }

    /// Something other than the input went wrong.
    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        ConstructError::Unexpected(err.into())
    }

    pub(crate) fn into_cause(self) -> BoxError {
        match self {
            ConstructError::Validation(e) | ConstructError::Unexpected(e) => e,
        }
    }
}

impl Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructError::Validation(e) => write!(f, "validation failed: {e}"),
            ConstructError::Unexpected(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for ConstructError {}
