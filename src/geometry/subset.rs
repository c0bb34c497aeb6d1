//! `Geometry`: a named subset of a network's pores and throats.
//!
//! A geometry owns two index maps (local index → network index) and the
//! per-element data that only makes sense on that subset, such as Voronoi
//! centroids. Local data is indexed by local position.
//!
//! Translating a network pore back to its local position is done through a
//! reverse index built once at construction. When a network pore appears
//! more than once in `pore_map`, the first local position wins.

use hashbrown::HashMap;

use crate::network_error::{ElementKind, NetworkError};

/// Qualified name of the pore centroid property.
pub const PORE_CENTROID: &str = "pore.centroid";
/// Qualified name of the throat centroid property.
pub const THROAT_CENTROID: &str = "throat.centroid";

#[derive(Clone, Debug)]
pub struct Geometry {
    name: String,
    pore_map: Vec<usize>,
    throat_map: Vec<usize>,
    pore_local: HashMap<usize, usize>,
    pore_centroid: Option<Vec<[f64; 3]>>,
    throat_centroid: Option<Vec<[f64; 3]>>,
}

impl Geometry {
    /// Build a geometry directly from its index maps.
    ///
    /// This does not label any network; use
    /// [`Network::add_geometry`](crate::topology::network::Network::add_geometry)
    /// to register a geometry with its network.
    pub fn from_maps(name: &str, pore_map: Vec<usize>, throat_map: Vec<usize>) -> Self {
        let mut pore_local = HashMap::with_capacity(pore_map.len());
        for (local, &global) in pore_map.iter().enumerate() {
            pore_local.entry(global).or_insert(local);
        }
        Self {
            name: name.to_string(),
            pore_map,
            throat_map,
            pore_local,
            pore_centroid: None,
            throat_centroid: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local pore index → network pore index.
    #[inline]
    pub fn pore_map(&self) -> &[usize] {
        &self.pore_map
    }

    /// Local throat index → network throat index.
    #[inline]
    pub fn throat_map(&self) -> &[usize] {
        &self.throat_map
    }

    #[inline]
    pub fn num_pores(&self) -> usize {
        self.pore_map.len()
    }

    #[inline]
    pub fn num_throats(&self) -> usize {
        self.throat_map.len()
    }

    /// Local position of network pore `pore`.
    ///
    /// Fails with [`NetworkError::MappingNotFound`] when the pore is not part
    /// of this geometry, e.g. for a throat spanning two geometries.
    pub fn local_pore(&self, pore: usize) -> Result<usize, NetworkError> {
        self.pore_local
            .get(&pore)
            .copied()
            .ok_or_else(|| NetworkError::MappingNotFound {
                geometry: self.name.clone(),
                pore,
            })
    }

    /// Store one centroid per local pore.
    pub fn set_pore_centroids(&mut self, centroids: Vec<[f64; 3]>) -> Result<(), NetworkError> {
        check_len(PORE_CENTROID, self.pore_map.len(), centroids.len())?;
        self.pore_centroid = Some(centroids);
        Ok(())
    }

    /// Store one centroid per local throat.
    pub fn set_throat_centroids(&mut self, centroids: Vec<[f64; 3]>) -> Result<(), NetworkError> {
        check_len(THROAT_CENTROID, self.throat_map.len(), centroids.len())?;
        self.throat_centroid = Some(centroids);
        Ok(())
    }

    /// Pore centroids in local order.
    pub fn pore_centroids(&self) -> Result<&[[f64; 3]], NetworkError> {
        self.pore_centroid
            .as_deref()
            .ok_or_else(|| NetworkError::missing(PORE_CENTROID))
    }

    /// Throat centroids in local order.
    pub fn throat_centroids(&self) -> Result<&[[f64; 3]], NetworkError> {
        self.throat_centroid
            .as_deref()
            .ok_or_else(|| NetworkError::missing(THROAT_CENTROID))
    }

    /// Network index of local element `local` of `kind`.
    pub fn to_network(&self, kind: ElementKind, local: usize) -> Result<usize, NetworkError> {
        let map = match kind {
            ElementKind::Pore => &self.pore_map,
            ElementKind::Throat => &self.throat_map,
        };
        map.get(local).copied().ok_or(NetworkError::IndexOutOfRange {
            kind,
            index: local,
            len: map.len(),
        })
    }
}

fn check_len(name: &str, expected: usize, found: usize) -> Result<(), NetworkError> {
    if expected == found {
        Ok(())
    } else {
        Err(NetworkError::PropertyLengthMismatch {
            name: name.to_string(),
            expected,
            found,
        })
    }
}
