//! Data module: per-element property storage
#![warn(missing_docs)]

pub mod properties;

pub use properties::PropertyStore;
