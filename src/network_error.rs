//! NetworkError: Unified error type for pore-sieve public APIs
//!
//! Every fallible operation on networks, geometries and property models
//! returns this error instead of panicking.

use std::fmt;
use thiserror::Error;

/// Which kind of network element an index or property refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ElementKind {
    Pore,
    Throat,
}

impl ElementKind {
    /// Property-name prefix for this kind (`"pore"` or `"throat"`).
    pub const fn prefix(self) -> &'static str {
        match self {
            ElementKind::Pore => "pore",
            ElementKind::Throat => "throat",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Unified error type for pore-sieve operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    /// A named property was requested but never stored.
    #[error("Missing property `{name}`")]
    MissingProperty { name: String },
    /// A throat's connection entry points outside the pore range.
    #[error("Invalid topology: throat {throat} references pore {pore}, but network has {num_pores} pores")]
    InvalidTopology {
        throat: usize,
        pore: usize,
        num_pores: usize,
    },
    /// A throat connects a pore to itself.
    #[error("Invalid topology: throat {throat} connects pore {pore} to itself")]
    SelfLoop { throat: usize, pore: usize },
    /// A network pore referenced by a geometry throat is absent from the geometry's pore map.
    #[error("Geometry `{geometry}` has no local entry for network pore {pore}")]
    MappingNotFound { geometry: String, pore: usize },
    /// Stored property array does not match the element count.
    #[error("Property `{name}` has {found} values, expected {expected}")]
    PropertyLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Property names must be qualified with `pore.` or `throat.`.
    #[error("Invalid property name `{0}`")]
    InvalidPropertyName(String),
    /// An element index is outside `0..len`.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: ElementKind,
        index: usize,
        len: usize,
    },
    /// A geometry with this name is already registered on the network.
    #[error("Geometry `{0}` already exists")]
    DuplicateGeometry(String),
    /// An element was assigned to a second geometry.
    #[error("{kind} {element} already belongs to geometry `{owner}`, cannot add to `{geometry}`")]
    OverlappingGeometry {
        geometry: String,
        owner: String,
        kind: ElementKind,
        element: usize,
    },
    /// Generator arguments are unusable.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    /// A NaN or infinite throat length under the `Error` policy.
    #[error("Throat {throat} has a non-finite length")]
    NonFiniteLength { throat: usize },
    /// A negative throat length under the `Error` policy.
    #[error("Throat {throat} has negative length {value}")]
    NegativeLength { throat: usize, value: f64 },
}

impl NetworkError {
    pub(crate) fn missing(name: impl Into<String>) -> Self {
        NetworkError::MissingProperty { name: name.into() }
    }
}
