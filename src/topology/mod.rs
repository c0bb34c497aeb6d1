//! Top-level module for pore-network topology.
//!
//! This module provides:
//! - [`labels`]: named boolean labels over pores or throats
//! - [`network`]: the [`Network`](network::Network) container
//! - [`validation`]: connection-table checks

pub mod labels;
pub mod network;
pub mod validation;

pub use labels::{LabelMode, LabelSet};
pub use network::Network;
