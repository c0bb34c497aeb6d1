//! Geometry utilities for pore-sieve.
//!
//! A [`Geometry`] is a named subset of a network together with the data
//! that only exists on that subset. The [`models`] submodule evaluates
//! geometric properties such as throat lengths over it.

pub mod models;
pub mod subset;
pub mod vector;

pub use subset::Geometry;
