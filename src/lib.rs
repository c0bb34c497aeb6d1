#![cfg_attr(docsrs, feature(doc_cfg))]
//! # pore-sieve
//!
//! pore-sieve is a pore-network modeling library for simulating transport
//! through porous materials. A material is represented as a graph of pores
//! (nodes) joined by throats (edges). The crate provides the network
//! container with labeled subsets and named properties, geometries that
//! assign pore-scale models to a subset of the network, geometric property
//! models, and structured lattice generators.
//!
//! ## Features
//! - [`Network`](topology::network::Network): pore coordinates, throat
//!   connections, boolean labels, and per-element properties
//! - [`Geometry`](geometry::Geometry): local/global index maps, reverse pore
//!   index, Voronoi centroids
//! - Throat length models: [`straight`](geometry::models::throat_length::straight)
//!   and [`voronoi`](geometry::models::throat_length::voronoi)
//! - Lattice generators: [`cubic`](network_generation::cubic) and
//!   [`cubic_dual`](network_generation::cubic_dual)
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! pore-sieve = "0.1"
//! # Optional features:
//! # features = ["rayon"]
//! ```
//!
//! With the `rayon` feature, per-throat model evaluation runs in parallel.
//! Results are identical to the serial path.
//!
//! ## Logging
//! Non-fatal findings (clamped throat lengths, duplicate throats) are
//! reported through the [`log`] facade. Install any logger to see them.

pub mod data;
pub mod geometry;
pub mod network_error;
pub mod network_generation;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::properties::PropertyStore;
    pub use crate::geometry::Geometry;
    pub use crate::geometry::models::throat_length::{
        NegativeLengthPolicy, StraightOptions, ThroatLengths,
    };
    pub use crate::network_error::{ElementKind, NetworkError};
    pub use crate::network_generation::{CubicDualOptions, cubic, cubic_dual};
    pub use crate::topology::labels::{LabelMode, LabelSet};
    pub use crate::topology::network::Network;
}
