//! Throat length models.
//!
//! - [`straight`]: centre-to-centre pore distance minus both pore radii.
//! - [`voronoi`]: pore centroid → throat centroid → pore centroid path
//!   length, for geometries carrying Voronoi centroids.
//!
//! Both return one value per geometry throat, in the geometry's local
//! throat order.

use serde::{Deserialize, Serialize};

use crate::geometry::subset::Geometry;
use crate::geometry::vector::{distance, norm, sub};
use crate::network_error::{ElementKind, NetworkError};
use crate::topology::network::Network;

/// Default pore diameter property consulted by [`straight`].
pub const DEFAULT_PORE_DIAMETER: &str = "pore.diameter";
/// Length assigned to throats whose computed length is negative or non-finite.
pub const DEFAULT_LENGTH_FLOOR: f64 = 1e-9;

/// What [`straight`] does with negative or non-finite lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegativeLengthPolicy {
    /// Replace with the configured floor and log a warning.
    #[default]
    Clamp,
    /// Return the raw values.
    Keep,
    /// Fail with [`NetworkError::NonFiniteLength`] or
    /// [`NetworkError::NegativeLength`].
    Error,
}

/// Options for [`straight`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightOptions {
    /// Qualified name of the pore diameter property.
    pub pore_diameter: String,
    pub negative: NegativeLengthPolicy,
    /// Replacement value under [`NegativeLengthPolicy::Clamp`].
    pub floor: f64,
}

impl Default for StraightOptions {
    fn default() -> Self {
        Self {
            pore_diameter: DEFAULT_PORE_DIAMETER.to_string(),
            negative: NegativeLengthPolicy::Clamp,
            floor: DEFAULT_LENGTH_FLOOR,
        }
    }
}

/// Throat lengths for one geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThroatLengths {
    /// One length per geometry throat, in local order.
    pub values: Vec<f64>,
    /// Local positions whose negative or non-finite value was replaced by the floor.
    pub clamped: Vec<usize>,
}

impl ThroatLengths {
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Straight-line throat length: the distance between the two pore centres
/// minus the two pore radii.
///
/// Lengths are computed for every network throat and then restricted to the
/// throats labeled with the geometry's name, in ascending network order.
pub fn straight(
    network: &Network,
    geometry: &Geometry,
    options: &StraightOptions,
) -> Result<ThroatLengths, NetworkError> {
    let diameter = network.pore_property(&options.pore_diameter)?;
    let num_pores = network.np();
    if diameter.len() != num_pores {
        return Err(NetworkError::PropertyLengthMismatch {
            name: options.pore_diameter.clone(),
            expected: num_pores,
            found: diameter.len(),
        });
    }
    let coords = network.coords();

    let all = map_throats(network.connections(), |throat, &[p1, p2]| {
        let c1 = lookup(coords, throat, p1, num_pores)?;
        let c2 = lookup(coords, throat, p2, num_pores)?;
        let d1 = lookup(diameter, throat, p1, num_pores)?;
        let d2 = lookup(diameter, throat, p2, num_pores)?;
        Ok(distance(c1, c2) - (d1 + d2) / 2.0)
    })?;

    let throats = network.throats_in(geometry.name());
    let mut values = throats
        .iter()
        .map(|&t| {
            all.get(t).copied().ok_or(NetworkError::IndexOutOfRange {
                kind: ElementKind::Throat,
                index: t,
                len: all.len(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let negative: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(local, &value)| (value < 0.0).then_some(local))
        .collect();
    let non_finite: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(local, &value)| (!value.is_finite()).then_some(local))
        .collect();
    if negative.is_empty() && non_finite.is_empty() {
        return Ok(ThroatLengths {
            values,
            clamped: Vec::new(),
        });
    }

    match options.negative {
        NegativeLengthPolicy::Clamp => {
            if !negative.is_empty() {
                log::warn!(
                    "Negative throat lengths are calculated in geometry `{}`: count={}; arbitrary positive length assigned ({} meters)",
                    geometry.name(),
                    negative.len(),
                    options.floor
                );
            }
            if !non_finite.is_empty() {
                log::warn!(
                    "Non-finite throat lengths are calculated in geometry `{}`: count={}; check `{}` for missing values; arbitrary positive length assigned ({} meters)",
                    geometry.name(),
                    non_finite.len(),
                    options.pore_diameter,
                    options.floor
                );
            }
            let mut clamped: Vec<usize> = negative.into_iter().chain(non_finite).collect();
            clamped.sort_unstable();
            clamped.dedup();
            for &local in &clamped {
                values[local] = options.floor;
            }
            Ok(ThroatLengths { values, clamped })
        }
        NegativeLengthPolicy::Keep => {
            if !non_finite.is_empty() {
                log::warn!(
                    "Non-finite throat lengths are calculated in geometry `{}`: count={}; check `{}` for missing values",
                    geometry.name(),
                    non_finite.len(),
                    options.pore_diameter
                );
            }
            Ok(ThroatLengths {
                values,
                clamped: Vec::new(),
            })
        }
        NegativeLengthPolicy::Error => match (non_finite.first(), negative.first()) {
            (Some(&local), _) => Err(NetworkError::NonFiniteLength {
                throat: throats[local],
            }),
            (None, Some(&local)) => Err(NetworkError::NegativeLength {
                throat: throats[local],
                value: values[local],
            }),
            (None, None) => Ok(ThroatLengths {
                values,
                clamped: Vec::new(),
            }),
        },
    }
}

/// Centroid path throat length: |t − c₁| + |t − c₂| where `t` is the throat
/// centroid and `c₁`, `c₂` the centroids of the two connected pores.
///
/// Both pores of every geometry throat must belong to the geometry;
/// otherwise this fails with [`NetworkError::MappingNotFound`].
pub fn voronoi(network: &Network, geometry: &Geometry) -> Result<ThroatLengths, NetworkError> {
    voronoi_with(network, geometry, |pore| geometry.local_pore(pore))
}

/// Same as [`voronoi`] but resolves local pores by scanning `pore_map`.
///
/// Kept as the reference lookup for equivalence tests and benchmarks.
pub fn voronoi_linear(
    network: &Network,
    geometry: &Geometry,
) -> Result<ThroatLengths, NetworkError> {
    let pore_map = geometry.pore_map();
    voronoi_with(network, geometry, |pore| {
        pore_map
            .iter()
            .position(|&p| p == pore)
            .ok_or_else(|| NetworkError::MappingNotFound {
                geometry: geometry.name().to_string(),
                pore,
            })
    })
}

fn voronoi_with<F>(
    network: &Network,
    geometry: &Geometry,
    local_pore: F,
) -> Result<ThroatLengths, NetworkError>
where
    F: Fn(usize) -> Result<usize, NetworkError> + Sync,
{
    let pore_centroids = geometry.pore_centroids()?;
    let throat_centroids = geometry.throat_centroids()?;

    let values = map_throats(geometry.throat_map(), |local, &throat| {
        let [p1, p2] = network.throat_conns(throat)?;
        let g1 = local_pore(p1)?;
        let g2 = local_pore(p2)?;
        let t = throat_centroids[local];
        Ok(norm(sub(t, pore_centroids[g1])) + norm(sub(t, pore_centroids[g2])))
    })?;

    Ok(ThroatLengths {
        values,
        clamped: Vec::new(),
    })
}

fn lookup<T: Copy>(
    values: &[T],
    throat: usize,
    pore: usize,
    num_pores: usize,
) -> Result<T, NetworkError> {
    values.get(pore).copied().ok_or(NetworkError::InvalidTopology {
        throat,
        pore,
        num_pores,
    })
}

#[cfg(not(feature = "rayon"))]
fn map_throats<T, F>(items: &[T], f: F) -> Result<Vec<f64>, NetworkError>
where
    T: Sync,
    F: Fn(usize, &T) -> Result<f64, NetworkError> + Sync,
{
    items
        .iter()
        .enumerate()
        .map(|(index, item)| f(index, item))
        .collect()
}

#[cfg(feature = "rayon")]
fn map_throats<T, F>(items: &[T], f: F) -> Result<Vec<f64>, NetworkError>
where
    T: Sync,
    F: Fn(usize, &T) -> Result<f64, NetworkError> + Sync,
{
    use rayon::prelude::*;
    items
        .par_iter()
        .enumerate()
        .map(|(index, item)| f(index, item))
        .collect()
}
