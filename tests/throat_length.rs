mod util;

use pore_sieve::geometry::Geometry;
use pore_sieve::geometry::models::throat_length::{
    DEFAULT_LENGTH_FLOOR, NegativeLengthPolicy, StraightOptions, straight, voronoi,
    voronoi_linear,
};
use pore_sieve::network_error::NetworkError;
use pore_sieve::network_generation::{CubicDualOptions, cubic, cubic_dual};
use pore_sieve::topology::network::Network;
use serial_test::serial;

fn pair(diameter: f64) -> (Network, Geometry) {
    let mut net = Network::new(vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]], vec![[0, 1]]).unwrap();
    net.set_pore_property("pore.diameter", vec![diameter, diameter])
        .unwrap();
    let geom = net.add_geometry("geo", [0, 1], [0]).unwrap();
    (net, geom)
}

#[test]
#[serial]
fn straight_two_pores_unit_diameter() {
    util::capture_logs();
    let (net, geom) = pair(1.0);
    let out = straight(&net, &geom, &StraightOptions::default()).unwrap();
    assert_eq!(out.values, vec![2.0]);
    assert!(util::take_warnings().is_empty());
}

#[test]
#[serial]
fn straight_clamps_negative_length_and_warns() {
    util::capture_logs();
    let (net, geom) = pair(10.0);
    let out = straight(&net, &geom, &StraightOptions::default()).unwrap();
    assert_eq!(out.values, vec![DEFAULT_LENGTH_FLOOR]);
    assert_eq!(out.clamped, vec![0]);

    let warnings = util::take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Negative throat lengths are calculated"));
    assert!(warnings[0].contains("arbitrary positive length assigned"));
}

#[test]
#[serial]
fn straight_coincident_pores_take_floor() {
    util::capture_logs();
    let mut net = Network::new(vec![[1.0, 1.0, 1.0]; 2], vec![[0, 1]]).unwrap();
    net.set_pore_property("pore.size", vec![0.4, 0.4]).unwrap();
    let geom = net.add_geometry("geo", [0, 1], [0]).unwrap();

    let keep = StraightOptions {
        pore_diameter: "pore.size".into(),
        negative: NegativeLengthPolicy::Keep,
        ..Default::default()
    };
    let raw = straight(&net, &geom, &keep).unwrap();
    assert!((raw.values[0] + 0.4).abs() < 1e-12);

    let options = StraightOptions {
        pore_diameter: "pore.size".into(),
        floor: 1e-6,
        ..Default::default()
    };
    let out = straight(&net, &geom, &options).unwrap();
    assert_eq!(out.values, vec![1e-6]);
    assert_eq!(util::take_warnings().len(), 1);
}

fn grown_line() -> (Network, Geometry) {
    let mut net = Network::new(vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]], vec![[0, 1]]).unwrap();
    net.set_pore_property("pore.diameter", vec![1.0, 1.0])
        .unwrap();
    net.extend(vec![[6.0, 0.0, 0.0]], vec![[1, 2]]).unwrap();
    let geom = net.add_geometry("geo", 0..3, 0..2).unwrap();
    (net, geom)
}

#[test]
#[serial]
fn straight_clamps_lengths_from_unset_diameters_and_warns() {
    util::capture_logs();
    let (net, geom) = grown_line();
    assert!(net.pore_property("pore.diameter").unwrap()[2].is_nan());

    let out = straight(&net, &geom, &StraightOptions::default()).unwrap();
    assert_eq!(out.values, vec![2.0, DEFAULT_LENGTH_FLOOR]);
    assert_eq!(out.clamped, vec![1]);
    assert!(out.values.iter().all(|v| v.is_finite()));

    let warnings = util::take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Non-finite throat lengths are calculated"));
    assert!(warnings[0].contains("pore.diameter"));
}

#[test]
#[serial]
fn straight_non_finite_length_policies() {
    util::capture_logs();
    let (net, geom) = grown_line();

    let keep = StraightOptions {
        negative: NegativeLengthPolicy::Keep,
        ..Default::default()
    };
    let raw = straight(&net, &geom, &keep).unwrap();
    assert_eq!(raw.values[0], 2.0);
    assert!(raw.values[1].is_nan());
    assert!(raw.clamped.is_empty());
    assert_eq!(util::take_warnings().len(), 1);

    let strict = StraightOptions {
        negative: NegativeLengthPolicy::Error,
        ..Default::default()
    };
    assert_eq!(
        straight(&net, &geom, &strict),
        Err(NetworkError::NonFiniteLength { throat: 1 })
    );
}

#[test]
fn straight_only_reports_geometry_throats() {
    let mut net = cubic([4, 1, 1], [1.0; 3]).unwrap();
    net.set_pore_property("pore.diameter", vec![0.5; 4]).unwrap();
    let geo_a = net.add_geometry("geo_a", [0, 1], [0]).unwrap();
    let geo_b = net.add_geometry("geo_b", [2, 3], [2, 1]).unwrap();

    let options = StraightOptions::default();
    assert_eq!(straight(&net, &geo_a, &options).unwrap().values, vec![0.5]);
    let out = straight(&net, &geo_b, &options).unwrap();
    assert_eq!(out.values.len(), geo_b.num_throats());
    assert_eq!(out.values, vec![0.5, 0.5]);
}

#[test]
fn straight_missing_diameter_fails() {
    let net = Network::new(vec![[0.0; 3], [1.0, 0.0, 0.0]], vec![[0, 1]]).unwrap();
    let geom = Geometry::from_maps("geo", vec![0, 1], vec![0]);
    assert_eq!(
        straight(&net, &geom, &StraightOptions::default()),
        Err(NetworkError::MissingProperty {
            name: "pore.diameter".into()
        })
    );
}

fn voronoi_pair() -> (Network, Geometry) {
    let mut net = Network::new(
        vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [9.0, 9.0, 9.0]],
        vec![[0, 1], [1, 2]],
    )
    .unwrap();
    let mut geom = net.add_geometry("vor", [0, 1], [0]).unwrap();
    geom.set_pore_centroids(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]])
        .unwrap();
    geom.set_throat_centroids(vec![[1.0, 1.0, 0.0]]).unwrap();
    (net, geom)
}

#[test]
fn voronoi_sums_centroid_distances() {
    let (net, geom) = voronoi_pair();
    let out = voronoi(&net, &geom).unwrap();
    let expected = 2.0 * 2f64.sqrt();
    assert_eq!(out.values.len(), 1);
    assert!((out.values[0] - expected).abs() < 1e-12);
    assert_eq!(voronoi_linear(&net, &geom).unwrap(), out);
}

#[test]
fn voronoi_cross_geometry_throat_is_mapping_error() {
    let (net, _) = voronoi_pair();
    let mut geom = Geometry::from_maps("edge", vec![1], vec![1]);
    geom.set_pore_centroids(vec![[2.0, 0.0, 0.0]]).unwrap();
    geom.set_throat_centroids(vec![[5.0, 5.0, 5.0]]).unwrap();
    let expected = NetworkError::MappingNotFound {
        geometry: "edge".into(),
        pore: 2,
    };
    assert_eq!(voronoi(&net, &geom), Err(expected.clone()));
    assert_eq!(voronoi_linear(&net, &geom), Err(expected));
}

#[test]
fn voronoi_requires_centroids() {
    let mut net = Network::new(vec![[0.0; 3], [1.0, 0.0, 0.0]], vec![[0, 1]]).unwrap();
    let geom = net.add_geometry("vor", [0, 1], [0]).unwrap();
    assert_eq!(
        voronoi(&net, &geom),
        Err(NetworkError::MissingProperty {
            name: "pore.centroid".into()
        })
    );
}

#[test]
fn voronoi_on_generated_network_matches_straight_for_point_pores() {
    // With centroids at pore centres and throat centroids at midpoints,
    // the path length equals the centre distance.
    let mut net = cubic_dual([2, 2, 2], &CubicDualOptions::default()).unwrap();
    net.set_pore_property("pore.diameter", vec![0.0; net.np()])
        .unwrap();
    let mut geom = net.add_geometry("all_geo", 0..net.np(), 0..net.nt()).unwrap();
    geom.set_pore_centroids(net.coords().to_vec()).unwrap();
    let mids = net
        .connections()
        .iter()
        .map(|&[a, b]| {
            let (ca, cb) = (net.coords()[a], net.coords()[b]);
            [
                (ca[0] + cb[0]) / 2.0,
                (ca[1] + cb[1]) / 2.0,
                (ca[2] + cb[2]) / 2.0,
            ]
        })
        .collect();
    geom.set_throat_centroids(mids).unwrap();

    let vor = voronoi(&net, &geom).unwrap().into_values();
    let st = straight(&net, &geom, &StraightOptions::default())
        .unwrap()
        .into_values();
    assert_eq!(vor.len(), net.nt());
    for (v, s) in vor.iter().zip(&st) {
        assert!((v - s).abs() < 1e-12, "voronoi {v} != straight {s}");
    }
}

#[test]
fn straight_options_from_json_config() {
    let options: StraightOptions = serde_json::from_str(
        r#"{ "pore_diameter": "pore.seed_diameter", "negative": "Keep", "floor": 1e-12 }"#,
    )
    .unwrap();
    assert_eq!(options.pore_diameter, "pore.seed_diameter");
    assert_eq!(options.negative, NegativeLengthPolicy::Keep);
    assert_eq!(options.floor, 1e-12);
    assert_eq!(
        serde_json::to_value(StraightOptions::default()).unwrap()["pore_diameter"],
        "pore.diameter"
    );
}

#[test]
fn straight_on_network_loaded_from_json() {
    let (net, _) = pair(1.0);
    let value = serde_json::to_value(&net).unwrap();

    let loaded: Network = serde_json::from_value(value.clone()).unwrap();
    let geom = Geometry::from_maps("geo", vec![0, 1], vec![0]);
    assert_eq!(
        straight(&loaded, &geom, &StraightOptions::default())
            .unwrap()
            .values,
        vec![2.0]
    );

    let mut stale_label = value.clone();
    stale_label["throat_labels"]["labels"]["geo"] = serde_json::json!([0, 7]);
    assert!(serde_json::from_value::<Network>(stale_label).is_err());

    let mut short_diameter = value;
    short_diameter["pore_props"]["values"]["pore.diameter"] = serde_json::json!([1.0]);
    let err = serde_json::from_value::<Network>(short_diameter).unwrap_err();
    assert!(err.to_string().contains("pore.diameter"), "{err}");
}
