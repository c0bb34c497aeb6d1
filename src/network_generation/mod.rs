//! Structured network generators with face labeling.
//!
//! - [`cubic`]: simple cubic lattice, pores at cell centres.
//! - [`add_boundaries`]: one boundary pore per face pore, on the domain face.
//! - [`cubic_dual`]: a cubic lattice with boundaries interleaved with its
//!   dual (corner) lattice, joined by `interconnect` throats.
//!
//! Face labels follow the usual convention: `front`/`back` at x min/max,
//! `left`/`right` at y min/max, `bottom`/`top` at z min/max.

use std::ops::Range;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::geometry::vector::distance;
use crate::network_error::NetworkError;
use crate::topology::labels::LabelMode;
use crate::topology::network::Network;

pub const FRONT: &str = "front";
pub const BACK: &str = "back";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const BOTTOM: &str = "bottom";
pub const TOP: &str = "top";
pub const SURFACE: &str = "surface";
pub const INTERNAL: &str = "internal";
pub const BOUNDARY: &str = "boundary";
pub const INTERCONNECT: &str = "interconnect";

/// Face labels with their axis and side (`false` = min, `true` = max).
pub const FACES: [(&str, usize, bool); 6] = [
    (FRONT, 0, false),
    (BACK, 0, true),
    (LEFT, 1, false),
    (RIGHT, 1, true),
    (BOTTOM, 2, false),
    (TOP, 2, true),
];

/// Options for [`cubic_dual`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicDualOptions {
    /// Lattice spacing per axis.
    pub spacing: [f64; 3],
    /// Label for the primary lattice (with its boundary pores).
    pub label_1: String,
    /// Label for the dual lattice.
    pub label_2: String,
}

impl Default for CubicDualOptions {
    fn default() -> Self {
        Self {
            spacing: [1.0; 3],
            label_1: "primary".to_string(),
            label_2: "secondary".to_string(),
        }
    }
}

fn invalid_shape(message: impl Into<String>) -> NetworkError {
    NetworkError::InvalidShape(message.into())
}

fn check_args(shape: [usize; 3], spacing: [f64; 3]) -> Result<(), NetworkError> {
    if shape.iter().any(|&n| n == 0) {
        return Err(invalid_shape(format!("shape {shape:?} must be positive")));
    }
    if spacing.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
        return Err(invalid_shape(format!(
            "spacing {spacing:?} must be finite and positive"
        )));
    }
    lattice_throats(shape)?;
    Ok(())
}

/// Upper bound on the throat count of a lattice, `3 * nx * ny * nz`.
///
/// Every pore index and the connection buffer size fit in `usize` once this
/// succeeds.
fn lattice_throats(shape: [usize; 3]) -> Result<usize, NetworkError> {
    let [nx, ny, nz] = shape;
    nx.checked_mul(ny)
        .and_then(|n| n.checked_mul(nz))
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| invalid_shape(format!("shape {shape:?} is too large")))
}

/// Generate a cubic lattice of `shape[0]`×`shape[1]`×`shape[2]` pores.
///
/// Pore `(i, j, k)` has index `i + nx * (j + ny * k)` and sits at
/// `((i + ½)·sx, (j + ½)·sy, (k + ½)·sz)`. Neighbours along each axis are
/// joined by a throat.
pub fn cubic(shape: [usize; 3], spacing: [f64; 3]) -> Result<Network, NetworkError> {
    check_args(shape, spacing)?;
    let [nx, ny, nz] = shape;
    let index = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);

    let coords: Vec<[f64; 3]> = iproduct!(0..nz, 0..ny, 0..nx)
        .map(|(k, j, i)| {
            [
                (i as f64 + 0.5) * spacing[0],
                (j as f64 + 0.5) * spacing[1],
                (k as f64 + 0.5) * spacing[2],
            ]
        })
        .collect();

    let mut conns = Vec::with_capacity(lattice_throats(shape)?);
    for (k, j, i) in iproduct!(0..nz, 0..ny, 0..nx) {
        let here = index(i, j, k);
        if i + 1 < nx {
            conns.push([here, index(i + 1, j, k)]);
        }
        if j + 1 < ny {
            conns.push([here, index(i, j + 1, k)]);
        }
        if k + 1 < nz {
            conns.push([here, index(i, j, k + 1)]);
        }
    }

    let mut network = Network::new(coords, conns)?;
    for &(label, axis, max_side) in &FACES {
        let last = shape[axis] - 1;
        let on_face: Vec<usize> = iproduct!(0..nz, 0..ny, 0..nx)
            .filter(|&(k, j, i)| {
                let ijk = [i, j, k];
                if max_side { ijk[axis] == last } else { ijk[axis] == 0 }
            })
            .map(|(k, j, i)| index(i, j, k))
            .collect();
        network.set_pore_label(on_face, label)?;
    }
    relabel_surface(&mut network)?;
    Ok(network)
}

/// Attach a boundary pore to every pore on each face of a [`cubic`] lattice.
///
/// Boundary pores sit on the domain face (at `0` or `shape·spacing` along
/// the face normal) and take over the face label; the pores they shield
/// lose it. Boundary pores are labeled `boundary`. Surface and internal
/// labels are recomputed afterwards.
///
/// Returns the index ranges of the added pores and throats.
pub fn add_boundaries(
    network: &mut Network,
    shape: [usize; 3],
    spacing: [f64; 3],
) -> Result<(Range<usize>, Range<usize>), NetworkError> {
    check_args(shape, spacing)?;
    let mut coords = Vec::new();
    let mut conns = Vec::new();
    let mut new_labels = Vec::new();
    let mut shielded = Vec::new();
    let first_new = network.np();

    for &(label, axis, max_side) in &FACES {
        let face_pores = network.pores(&[label], LabelMode::Union);
        let plane = if max_side {
            shape[axis] as f64 * spacing[axis]
        } else {
            0.0
        };
        for pore in face_pores {
            let mut c = network.pore_coord(pore)?;
            c[axis] = plane;
            conns.push([pore, first_new + coords.len()]);
            coords.push(c);
            new_labels.push(label);
            shielded.push((pore, label));
        }
    }

    let (pores, throats) = network.extend(coords, conns)?;
    for (pore, label) in shielded {
        network.unset_pore_label([pore], label);
    }
    for (pore, label) in pores.clone().zip(new_labels) {
        network.set_pore_label([pore], label)?;
    }
    network.set_pore_label(pores.clone(), BOUNDARY)?;
    relabel_surface(network)?;
    Ok((pores, throats))
}

/// Join each pore in `a` to each pore in `b` closer than `len_max`.
///
/// The new throats are labeled `label`; their index range is returned.
pub fn stitch(
    network: &mut Network,
    a: &[usize],
    b: &[usize],
    len_max: f64,
    label: &str,
) -> Result<Range<usize>, NetworkError> {
    let mut conns = Vec::new();
    for (&p, &q) in iproduct!(a, b) {
        if p == q {
            continue;
        }
        if distance(network.pore_coord(p)?, network.pore_coord(q)?) < len_max {
            conns.push([p, q]);
        }
    }
    let throats = network.add_throats(conns)?;
    network.set_throat_label(throats.clone(), label)?;
    log::debug!("Stitched {} throats labeled `{label}`", throats.len());
    Ok(throats)
}

/// Generate a cubic lattice interleaved with its dual.
///
/// The primary lattice is [`cubic`] plus [`add_boundaries`]; the secondary
/// lattice has `shape + 1` pores per axis at the primary cell corners.
/// Every primary/secondary pair closer than one lattice spacing is joined
/// by an `interconnect` throat.
pub fn cubic_dual(shape: [usize; 3], options: &CubicDualOptions) -> Result<Network, NetworkError> {
    check_args(shape, options.spacing)?;
    let unit = [1.0; 3];
    let [nx, ny, nz] = shape;
    let dual_shape = match (nx.checked_add(1), ny.checked_add(1), nz.checked_add(1)) {
        (Some(dx), Some(dy), Some(dz)) => [dx, dy, dz],
        _ => return Err(invalid_shape(format!("shape {shape:?} is too large"))),
    };
    check_args(dual_shape, unit)?;

    let mut network = cubic(shape, unit)?;
    add_boundaries(&mut network, shape, unit)?;
    network.set_pore_label(0..network.np(), &options.label_1)?;
    network.set_throat_label(0..network.nt(), &options.label_1)?;

    let mut dual = cubic(dual_shape, unit)?;
    dual.translate([-0.5; 3]);
    dual.set_pore_label(0..dual.np(), &options.label_2)?;
    dual.set_throat_label(0..dual.nt(), &options.label_2)?;

    let primary: Vec<usize> = (0..network.np()).collect();
    let (secondary, _) = network.merge(dual);
    let secondary: Vec<usize> = secondary.collect();
    stitch(&mut network, &primary, &secondary, 1.0, INTERCONNECT)?;
    relabel_surface(&mut network)?;

    network.scale(options.spacing);
    log::debug!(
        "Generated cubic dual network: shape={shape:?} pores={} throats={}",
        network.np(),
        network.nt()
    );
    Ok(network)
}

/// Recompute `surface`/`internal` labels.
///
/// A pore is on the surface when it carries any face label. A throat is on
/// the surface when both its pores are.
fn relabel_surface(network: &mut Network) -> Result<(), NetworkError> {
    let faces: Vec<&str> = FACES.iter().map(|&(label, _, _)| label).collect();
    let surface = network.pores(&faces, LabelMode::Union);
    let internal = network.pores(&faces, LabelMode::Difference);
    network.unset_pore_label(0..network.np(), SURFACE);
    network.unset_pore_label(0..network.np(), INTERNAL);
    network.set_pore_label(surface, SURFACE)?;
    network.set_pore_label(internal, INTERNAL)?;

    let labels = network.pore_labels();
    let (surface_t, internal_t): (Vec<usize>, Vec<usize>) = (0..network.nt()).partition(|&t| {
        let [p1, p2] = network.connections()[t];
        labels.has_label(p1, SURFACE) && labels.has_label(p2, SURFACE)
    });
    network.unset_throat_label(0..network.nt(), SURFACE);
    network.unset_throat_label(0..network.nt(), INTERNAL);
    network.set_throat_label(surface_t, SURFACE)?;
    network.set_throat_label(internal_t, INTERNAL)?;
    Ok(())
}
