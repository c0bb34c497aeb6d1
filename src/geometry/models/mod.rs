//! Pore-scale property models evaluated over a geometry.

pub mod throat_length;

pub use throat_length::{
    NegativeLengthPolicy, StraightOptions, ThroatLengths, straight, voronoi,
};
