#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// Rendering of the root path.
pub const ROOT_PLACEHOLDER: &str = "<json_root>";

/// A single step in a path through a decoded JSON document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStep {
    /// Index into an array
    Index(usize),
    /// Access a property of an object
    Property(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Index(idx) => write!(f, "[{idx}]"),
            PathStep::Property(name) => write!(f, ".{name}"),
        }
    }
}

/// Location inside a decoded JSON document, used for diagnostics.
///
/// A path is immutable: [`with_array_index`](Self::with_array_index) and
/// [`with_property`](Self::with_property) return a new path and leave `self`
/// untouched. Steps are shared between a path and the paths derived from it,
/// so descending one level costs a single small allocation.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    last: Option<Arc<Node>>,
}

#[derive(PartialEq, Eq, Hash)]
struct Node {
    parent: Option<Arc<Node>>,
    step: PathStep,
    depth: usize,
}

impl JsonPath {
    /// The path of the document root.
    pub const fn root() -> Self {
        Self { last: None }
    }

    /// Returns a new path that indexes into the array at the current location.
    #[must_use]
    pub fn with_array_index(&self, index: usize) -> Self {
        self.push(PathStep::Index(index))
    }

    /// Returns a new path that accesses a property of the object at the current location.
    #[must_use]
    pub fn with_property(&self, name: impl Into<String>) -> Self {
        self.push(PathStep::Property(name.into()))
    }

    fn push(&self, step: PathStep) -> Self {
        let depth = self.len() + 1;
        Self {
            last: Some(Arc::new(Node {
                parent: self.last.clone(),
                step,
                depth,
            })),
        }
    }

    /// Whether this is the root path.
    pub const fn is_root(&self) -> bool {
        self.last.is_none()
    }

    /// Number of steps from the root.
    pub fn len(&self) -> usize {
        self.last.as_ref().map_or(0, |node| node.depth)
    }

    /// Same as [`is_root`](Self::is_root).
    pub const fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// The last step taken, or `None` at the root.
    pub fn last(&self) -> Option<&PathStep> {
        self.last.as_ref().map(|node| &node.step)
    }

    /// The path one step up, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        self.last.as_ref().map(|node| Self {
            last: node.parent.clone(),
        })
    }

    /// The steps of this path, root first.
    pub fn steps(&self) -> Vec<PathStep> {
        let mut steps = Vec::with_capacity(self.len());
        let mut cursor = self.last.as_deref();
        while let Some(node) = cursor {
            steps.push(node.step.clone());
            cursor = node.parent.as_deref();
        }
        steps.reverse();
        steps
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(ROOT_PLACEHOLDER);
        }
        f.write_str("$")?;
        for step in self.steps() {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonPath({self})")
    }
}
