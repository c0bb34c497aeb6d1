//! The pore network: pore coordinates, throat connections, labels and
//! per-element properties.
//!
//! Pores and throats are dense indices `0..np()` / `0..nt()`, stable for the
//! lifetime of the network. Growth only ever appends. Every pore and throat
//! carries the `all` label.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::data::properties::PropertyStore;
use crate::geometry::subset::Geometry;
use crate::network_error::{ElementKind, NetworkError};
use crate::topology::labels::{LabelMode, LabelSet};
use crate::topology::validation::{self, HealthReport, TopologyIssueHandling};

/// Label applied to every pore and throat.
pub const ALL: &str = "all";

/// A graph of pores (nodes) joined by throats (edges).
///
/// Deserialization runs the same checks as [`Network::new`], plus label
/// index and property length checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "NetworkRepr")]
pub struct Network {
    coords: Vec<[f64; 3]>,
    conns: Vec<[usize; 2]>,
    pore_labels: LabelSet,
    throat_labels: LabelSet,
    pore_props: PropertyStore,
    throat_props: PropertyStore,
    geometries: Vec<String>,
}

#[derive(Deserialize)]
struct NetworkRepr {
    coords: Vec<[f64; 3]>,
    conns: Vec<[usize; 2]>,
    pore_labels: LabelSet,
    throat_labels: LabelSet,
    pore_props: PropertyStore,
    throat_props: PropertyStore,
    geometries: Vec<String>,
}

impl TryFrom<NetworkRepr> for Network {
    type Error = NetworkError;

    fn try_from(repr: NetworkRepr) -> Result<Self, Self::Error> {
        let np = repr.coords.len();
        let nt = repr.conns.len();
        validation::validate_connections(np, &repr.conns, 0)?;
        check_labels(&repr.pore_labels, ElementKind::Pore, np)?;
        check_labels(&repr.throat_labels, ElementKind::Throat, nt)?;
        check_store(&repr.pore_props, ElementKind::Pore, np)?;
        check_store(&repr.throat_props, ElementKind::Throat, nt)?;
        Ok(Network {
            coords: repr.coords,
            conns: repr.conns,
            pore_labels: repr.pore_labels,
            throat_labels: repr.throat_labels,
            pore_props: repr.pore_props,
            throat_props: repr.throat_props,
            geometries: repr.geometries,
        })
    }
}

fn check_labels(labels: &LabelSet, kind: ElementKind, len: usize) -> Result<(), NetworkError> {
    match labels.max_index() {
        Some((_, index)) if index >= len => Err(NetworkError::IndexOutOfRange { kind, index, len }),
        _ => Ok(()),
    }
}

fn check_store(store: &PropertyStore, kind: ElementKind, len: usize) -> Result<(), NetworkError> {
    if store.kind() != kind {
        let name = store.names().next().unwrap_or(kind.prefix());
        return Err(NetworkError::InvalidPropertyName(name.to_string()));
    }
    if store.len() != len {
        return Err(NetworkError::PropertyLengthMismatch {
            name: store.names().next().unwrap_or(kind.prefix()).to_string(),
            expected: len,
            found: store.len(),
        });
    }
    Ok(())
}

impl Default for Network {
    fn default() -> Self {
        Self {
            coords: Vec::new(),
            conns: Vec::new(),
            pore_labels: LabelSet::new(),
            throat_labels: LabelSet::new(),
            pore_props: PropertyStore::new(ElementKind::Pore, 0),
            throat_props: PropertyStore::new(ElementKind::Throat, 0),
            geometries: Vec::new(),
        }
    }
}

impl Network {
    /// Build a network from pore coordinates and throat connections.
    ///
    /// Fails with [`NetworkError::InvalidTopology`] if a connection references
    /// a missing pore, or [`NetworkError::SelfLoop`].
    pub fn new(coords: Vec<[f64; 3]>, conns: Vec<[usize; 2]>) -> Result<Self, NetworkError> {
        let mut network = Network::default();
        network.extend(coords, conns)?;
        Ok(network)
    }

    /// Number of pores.
    #[inline]
    pub fn np(&self) -> usize {
        self.coords.len()
    }

    /// Number of throats.
    #[inline]
    pub fn nt(&self) -> usize {
        self.conns.len()
    }

    /// Number of pores carrying `label`.
    pub fn num_pores(&self, label: &str) -> usize {
        self.pore_labels.count(label)
    }

    /// Number of throats carrying `label`.
    pub fn num_throats(&self, label: &str) -> usize {
        self.throat_labels.count(label)
    }

    /// Pore indices selected by `labels` combined with `mode`, ascending.
    pub fn pores(&self, labels: &[&str], mode: LabelMode) -> Vec<usize> {
        self.pore_labels.select(labels, mode, self.np())
    }

    /// Throat indices selected by `labels` combined with `mode`, ascending.
    pub fn throats(&self, labels: &[&str], mode: LabelMode) -> Vec<usize> {
        self.throat_labels.select(labels, mode, self.nt())
    }

    /// Throats carrying the label `name` (e.g. a geometry name), ascending.
    pub fn throats_in(&self, name: &str) -> Vec<usize> {
        self.throat_labels.indices(name)
    }

    /// Pores carrying the label `name`, ascending.
    pub fn pores_in(&self, name: &str) -> Vec<usize> {
        self.pore_labels.indices(name)
    }

    /// Pore coordinates, indexed by pore.
    #[inline]
    pub fn coords(&self) -> &[[f64; 3]] {
        &self.coords
    }

    /// Throat connection table, indexed by throat.
    #[inline]
    pub fn connections(&self) -> &[[usize; 2]] {
        &self.conns
    }

    /// Coordinate of `pore`.
    pub fn pore_coord(&self, pore: usize) -> Result<[f64; 3], NetworkError> {
        self.coords
            .get(pore)
            .copied()
            .ok_or(NetworkError::IndexOutOfRange {
                kind: ElementKind::Pore,
                index: pore,
                len: self.np(),
            })
    }

    /// The two pores joined by `throat`.
    pub fn throat_conns(&self, throat: usize) -> Result<[usize; 2], NetworkError> {
        self.conns
            .get(throat)
            .copied()
            .ok_or(NetworkError::IndexOutOfRange {
                kind: ElementKind::Throat,
                index: throat,
                len: self.nt(),
            })
    }

    /// Pore labels.
    #[inline]
    pub fn pore_labels(&self) -> &LabelSet {
        &self.pore_labels
    }

    /// Throat labels.
    #[inline]
    pub fn throat_labels(&self) -> &LabelSet {
        &self.throat_labels
    }

    /// Apply `label` to the given pores.
    pub fn set_pore_label<I>(&mut self, pores: I, label: &str) -> Result<(), NetworkError>
    where
        I: IntoIterator<Item = usize>,
    {
        let pores = checked(pores, ElementKind::Pore, self.np())?;
        self.pore_labels.set_labels(pores, label);
        Ok(())
    }

    /// Apply `label` to the given throats.
    pub fn set_throat_label<I>(&mut self, throats: I, label: &str) -> Result<(), NetworkError>
    where
        I: IntoIterator<Item = usize>,
    {
        let throats = checked(throats, ElementKind::Throat, self.nt())?;
        self.throat_labels.set_labels(throats, label);
        Ok(())
    }

    /// Remove `label` from the given pores.
    pub fn unset_pore_label<I>(&mut self, pores: I, label: &str) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        self.pore_labels.unset_labels(pores, label)
    }

    /// Remove `label` from the given throats.
    pub fn unset_throat_label<I>(&mut self, throats: I, label: &str) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        self.throat_labels.unset_labels(throats, label)
    }

    /// Pore property `name` (e.g. `pore.diameter`).
    pub fn pore_property(&self, name: &str) -> Result<&[f64], NetworkError> {
        self.pore_props.get(name)
    }

    /// Throat property `name` (e.g. `throat.length`).
    pub fn throat_property(&self, name: &str) -> Result<&[f64], NetworkError> {
        self.throat_props.get(name)
    }

    /// Look up a pore or throat property by its qualified name.
    pub fn property(&self, name: &str) -> Result<&[f64], NetworkError> {
        match name.split_once('.') {
            Some(("pore", _)) => self.pore_props.get(name),
            Some(("throat", _)) => self.throat_props.get(name),
            _ => Err(NetworkError::InvalidPropertyName(name.to_string())),
        }
    }

    /// Store pore property `name`; one value per pore.
    pub fn set_pore_property(&mut self, name: &str, values: Vec<f64>) -> Result<(), NetworkError> {
        self.pore_props.insert(name, values).map(|_| ())
    }

    /// Store throat property `name`; one value per throat.
    pub fn set_throat_property(
        &mut self,
        name: &str,
        values: Vec<f64>,
    ) -> Result<(), NetworkError> {
        self.throat_props.insert(name, values).map(|_| ())
    }

    /// Pore property store.
    #[inline]
    pub fn pore_properties(&self) -> &PropertyStore {
        &self.pore_props
    }

    /// Throat property store.
    #[inline]
    pub fn throat_properties(&self) -> &PropertyStore {
        &self.throat_props
    }

    /// Throat joining `p1` and `p2`, in either direction.
    pub fn find_connecting_throat(&self, p1: usize, p2: usize) -> Option<usize> {
        self.conns
            .iter()
            .position(|&[a, b]| (a == p1 && b == p2) || (a == p2 && b == p1))
    }

    /// Pores sharing a throat with `pore`, ascending and deduplicated.
    pub fn neighbor_pores(&self, pore: usize) -> Result<Vec<usize>, NetworkError> {
        if pore >= self.np() {
            return Err(NetworkError::IndexOutOfRange {
                kind: ElementKind::Pore,
                index: pore,
                len: self.np(),
            });
        }
        let mut out: Vec<usize> = self
            .conns
            .iter()
            .filter_map(|&[a, b]| match (a == pore, b == pore) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .collect();
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Append pores and throats. Connections in `conns` use network-global
    /// pore indices and may reference the new pores.
    ///
    /// Returns the index ranges of the added pores and throats. New elements
    /// carry `all`; existing properties are padded with `NaN`.
    pub fn extend(
        &mut self,
        coords: Vec<[f64; 3]>,
        conns: Vec<[usize; 2]>,
    ) -> Result<(Range<usize>, Range<usize>), NetworkError> {
        let np_new = self.np() + coords.len();
        validation::validate_connections(np_new, &conns, self.nt())?;
        let pores = self.np()..np_new;
        let throats = self.nt()..self.nt() + conns.len();

        self.coords.extend(coords);
        self.conns.extend(conns);
        self.pore_props.extend_len(pores.len());
        self.throat_props.extend_len(throats.len());
        self.pore_labels.set_labels(pores.clone(), ALL);
        self.throat_labels.set_labels(throats.clone(), ALL);
        Ok((pores, throats))
    }

    /// Add throats between existing pores. Returns their index range.
    pub fn add_throats(&mut self, conns: Vec<[usize; 2]>) -> Result<Range<usize>, NetworkError> {
        self.extend(Vec::new(), conns).map(|(_, throats)| throats)
    }

    /// Append every pore and throat of `donor`, shifting its indices.
    ///
    /// Labels and properties are carried over; geometries are not.
    pub fn merge(&mut self, donor: Network) -> (Range<usize>, Range<usize>) {
        let pore_offset = self.np();
        let throat_offset = self.nt();
        self.coords.extend(donor.coords);
        self.conns.extend(
            donor
                .conns
                .into_iter()
                .map(|[a, b]| [a + pore_offset, b + pore_offset]),
        );
        self.pore_labels.append_shifted(&donor.pore_labels, pore_offset);
        self.throat_labels
            .append_shifted(&donor.throat_labels, throat_offset);
        self.pore_props.append(&donor.pore_props);
        self.throat_props.append(&donor.throat_props);
        (pore_offset..self.np(), throat_offset..self.nt())
    }

    /// Shift every pore coordinate by `offset`.
    pub fn translate(&mut self, offset: [f64; 3]) {
        for c in &mut self.coords {
            for axis in 0..3 {
                c[axis] += offset[axis];
            }
        }
    }

    /// Scale every pore coordinate component-wise by `factors`.
    pub fn scale(&mut self, factors: [f64; 3]) {
        for c in &mut self.coords {
            for axis in 0..3 {
                c[axis] *= factors[axis];
            }
        }
    }

    /// Registered geometry names, in creation order.
    pub fn geometry_names(&self) -> &[String] {
        &self.geometries
    }

    /// Assign pores and throats to a new geometry named `name`.
    ///
    /// The network labels the elements with `name`; the returned
    /// [`Geometry`] maps its local indices (ascending network order) back
    /// to the network. An element may belong to one geometry only.
    pub fn add_geometry<P, T>(
        &mut self,
        name: &str,
        pores: P,
        throats: T,
    ) -> Result<Geometry, NetworkError>
    where
        P: IntoIterator<Item = usize>,
        T: IntoIterator<Item = usize>,
    {
        if self.geometries.iter().any(|g| g == name)
            || self.pore_labels.count(name) > 0
            || self.throat_labels.count(name) > 0
        {
            return Err(NetworkError::DuplicateGeometry(name.to_string()));
        }
        let mut pore_map = checked(pores, ElementKind::Pore, self.np())?;
        pore_map.sort_unstable();
        pore_map.dedup();
        let mut throat_map = checked(throats, ElementKind::Throat, self.nt())?;
        throat_map.sort_unstable();
        throat_map.dedup();

        for owner in &self.geometries {
            if let Some(&pore) = pore_map
                .iter()
                .find(|&&p| self.pore_labels.has_label(p, owner))
            {
                return Err(overlap(name, owner, ElementKind::Pore, pore));
            }
            if let Some(&throat) = throat_map
                .iter()
                .find(|&&t| self.throat_labels.has_label(t, owner))
            {
                return Err(overlap(name, owner, ElementKind::Throat, throat));
            }
        }

        self.pore_labels.set_labels(pore_map.iter().copied(), name);
        self.throat_labels.set_labels(throat_map.iter().copied(), name);
        self.geometries.push(name.to_string());
        log::debug!(
            "Geometry `{name}` assigned: pores={} throats={}",
            pore_map.len(),
            throat_map.len()
        );
        Ok(Geometry::from_maps(name, pore_map, throat_map))
    }

    /// Run non-fatal topology checks, logging any finding.
    pub fn check_health(&self) -> HealthReport {
        validation::check_health(self.np(), &self.conns, TopologyIssueHandling::Warn)
    }
}

fn checked<I>(indices: I, kind: ElementKind, len: usize) -> Result<Vec<usize>, NetworkError>
where
    I: IntoIterator<Item = usize>,
{
    indices
        .into_iter()
        .map(|index| {
            if index < len {
                Ok(index)
            } else {
                Err(NetworkError::IndexOutOfRange { kind, index, len })
            }
        })
        .collect()
}

fn overlap(geometry: &str, owner: &str, kind: ElementKind, element: usize) -> NetworkError {
    NetworkError::OverlappingGeometry {
        geometry: geometry.to_string(),
        owner: owner.to_string(),
        kind,
        element,
    }
}
