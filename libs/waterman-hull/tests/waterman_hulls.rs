use std::collections::HashMap;

use glam::DVec3;
use waterman_hull::{
    build_hull, waterman_polyhedron, waterman_polyhedron_with, HullConfig, HullError, Polyhedron, QuickHull,
};

fn face_sizes(hull: &Polyhedron) -> HashMap<usize, usize> {
    let mut sizes = HashMap::new();
    for face in hull.faces() {
        *sizes.entry(face.len()).or_insert(0) += 1;
    }
    sizes
}

#[test]
fn radius_two_is_an_octahedron() {
    let hull = waterman_polyhedron(2.0).unwrap();
    assert_eq!(hull.num_vertices(), 6);
    assert_eq!(hull.num_faces(), 8);
    assert_eq!(face_sizes(&hull), HashMap::from([(3, 8)]));
    for v in hull.vertices() {
        assert_eq!(v.length(), 2.0);
    }
}

#[test]
fn radius_sqrt_two_is_a_cuboctahedron() {
    let radius = std::f64::consts::SQRT_2;
    let cloud = waterman_lattice::generate(radius);
    assert_eq!(cloud.len(), 13);

    let hull = waterman_polyhedron(radius).unwrap();
    assert!(hull.is_valid());
    assert_eq!(hull.num_vertices(), 12);
    assert_eq!(hull.num_faces(), 14);
    assert_eq!(hull.edges().len(), 24);
    assert_eq!(face_sizes(&hull), HashMap::from([(3, 8), (4, 6)]));
    for v in hull.vertices() {
        assert_eq!(v.length_squared(), 2.0);
    }
}

#[test]
fn radius_one_and_a_half_is_a_cuboctahedron() {
    // any radius in [√2, 2) selects the same shell
    let hull = waterman_polyhedron(1.5).unwrap();
    assert_eq!(hull.num_vertices(), 12);
    assert_eq!(hull.num_faces(), 14);
    assert_eq!(face_sizes(&hull), HashMap::from([(3, 8), (4, 6)]));
}

#[test]
fn larger_radii_are_valid() {
    for radius in [3.0, 10.0_f64.sqrt(), 4.0, 5.0, 6.5] {
        let cloud = waterman_lattice::generate(radius);
        let hull = waterman_polyhedron(radius).unwrap();

        assert!(hull.is_valid(), "r={radius}");
        let euler = hull.num_vertices() as i64 - hull.edges().len() as i64 + hull.num_faces() as i64;
        assert_eq!(euler, 2, "r={radius}");
        hull.check(&cloud, 10.0 * hull.distance_tolerance()).unwrap();
    }
}

#[test]
fn hull_vertices_come_from_the_cloud() {
    let radius = 5.0;
    let cloud = waterman_lattice::generate(radius);
    let hull = waterman_polyhedron(radius).unwrap();
    for (v, &i) in hull.vertices().iter().zip(hull.vertex_point_indices()) {
        assert_eq!(*v, cloud[i]);
        assert!(v.length_squared() <= radius * radius);
    }
}

#[test]
fn face_sizes_sum_to_twice_the_edges() {
    for radius in [2.0, 3.0, 4.5] {
        let hull = waterman_polyhedron(radius).unwrap();
        let total: usize = hull.faces().iter().map(Vec::len).sum();
        assert_eq!(total, 2 * hull.edges().len());
    }
}

#[test]
fn hull_is_symmetric_about_the_origin() {
    let hull = waterman_polyhedron(4.0).unwrap();
    for v in hull.vertices() {
        assert!(hull.vertices().contains(&-*v), "missing mirror of {v:?}");
    }
}

#[test]
fn small_and_invalid_radii_fail() {
    assert_eq!(waterman_polyhedron(0.0), Err(HullError::InvalidInput { radius: 0.0 }));
    assert!(matches!(waterman_polyhedron(-3.0), Err(HullError::InvalidInput { .. })));
    assert!(matches!(waterman_polyhedron(f64::NAN), Err(HullError::InvalidInput { .. })));
    // only the origin
    assert!(matches!(waterman_polyhedron(1.0), Err(HullError::DegenerateCloud { .. })));
}

#[test]
fn explicit_config_reaches_the_builder() {
    let config = HullConfig::new(Some(1e-9), true).unwrap();
    let hull = waterman_polyhedron_with(3.0, &config).unwrap();
    assert_eq!(hull.distance_tolerance(), 1e-9);
    assert_eq!(hull, QuickHull::with_config(config).build(&waterman_lattice::generate(3.0)).unwrap());
}

#[test]
fn build_hull_reports_validity() {
    let outcome = build_hull(&waterman_lattice::generate(2.0));
    assert!(outcome.is_valid());
    assert!(outcome.error.is_none());

    let flat: Vec<DVec3> = (0..5).map(|i| DVec3::new(i as f64, (i * i) as f64, 0.0)).collect();
    let outcome = build_hull(&flat);
    assert!(!outcome.is_valid());
    assert!(outcome.error.unwrap().is_degenerate());
}

#[test]
fn build_is_deterministic() {
    let cloud = waterman_lattice::generate(4.2);
    let a = QuickHull::new().build(&cloud).unwrap();
    let b = QuickHull::new().build(&cloud).unwrap();
    assert_eq!(a, b);
}
