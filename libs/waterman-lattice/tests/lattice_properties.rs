use glam::DVec3;
use waterman_lattice::{admits, count, generate, generate_about};

#[test]
fn every_point_is_inside_and_even() {
    for radius in [1.0, 2.0, 2.5, 3.0, 4.2, 6.0, 8.0] {
        let r2 = radius * radius;
        for p in generate(radius) {
            assert!(p.length_squared() <= r2, "{p:?} outside r={radius}");
            let sum = (p.x + p.y + p.z) as i64;
            assert_eq!(sum.rem_euclid(2), 0, "{p:?} has odd sum");
            assert_eq!(p, p.round(), "{p:?} is not a lattice point");
        }
    }
}

#[test]
fn generate_is_idempotent() {
    for radius in [0.0, 1.0, 3.5, 7.0] {
        assert_eq!(generate(radius), generate(radius));
    }
}

#[test]
fn cloud_is_symmetric_about_origin() {
    let cloud = generate(5.0);
    for p in &cloud {
        assert!(cloud.contains(&-*p), "missing mirror of {p:?}");
    }
}

#[test]
fn counts_grow_with_radius() {
    let mut previous = 0;
    for radius in 1..=8 {
        let n = count(radius as f64);
        assert!(n >= previous);
        previous = n;
    }
    assert!(count(8.0) > count(4.0));
}

#[test]
fn generated_points_are_admitted() {
    let center = DVec3::new(1.0, 2.0, -1.0);
    for p in generate_about(3.0, center) {
        assert!(admits(3.0, center, p));
    }
}

#[test]
fn origin_centered_matches_generate() {
    assert_eq!(generate_about(4.5, DVec3::ZERO), generate(4.5));
}
