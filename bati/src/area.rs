//! Aire géodésique sur une sphère de rayon fixe
//!
//! Les coordonnées sont interprétées comme (longitude, latitude) en degrés
//! décimaux. Chaque segment contribue l'aire signée du triangle qu'il forme
//! avec le pôle nord ; la formulation en `atan2` reste stable près des pôles
//! et à la traversée de l'antiméridien.

use std::f64::consts::FRAC_PI_2;

use geo::{Coord, LineString, MultiPolygon, Polygon};

/// Rayon terrestre moyen (m)
pub const EARTH_RADIUS: f64 = 6_371_009.0;

/// Aire signée (m²) d'un anneau sur la sphère terrestre moyenne.
///
/// Positive pour un anneau parcouru dans le sens anti-horaire (en lon/lat),
/// négative sinon. Un anneau de moins de 3 points a une aire nulle.
pub fn signed_ring_area(ring: &[Coord]) -> f64 {
    signed_ring_area_with_radius(ring, EARTH_RADIUS)
}

/// Aire signée d'un anneau sur une sphère de rayon `radius`
pub fn signed_ring_area_with_radius(ring: &[Coord], radius: f64) -> f64 {
    let size = ring.len();
    if size < 3 {
        return 0.0;
    }

    // On boucle depuis le dernier point pour fermer l'anneau
    let prev = ring[size - 1];
    let mut prev_tan = half_colatitude_tan(prev.y);
    let mut prev_lng = prev.x.to_radians();

    let mut total = 0.0;
    for point in ring {
        let tan = half_colatitude_tan(point.y);
        let lng = point.x.to_radians();
        total += polar_triangle_area(tan, lng, prev_tan, prev_lng);
        prev_tan = tan;
        prev_lng = lng;
    }

    total * radius * radius
}

/// Aire non signée (m²) d'un anneau
pub fn unsigned_ring_area(ring: &LineString) -> f64 {
    signed_ring_area(&ring.0).abs()
}

/// Aire (m²) d'un polygone : extérieur moins les trous
pub fn polygon_area(polygon: &Polygon) -> f64 {
    let holes: f64 = polygon.interiors().iter().map(unsigned_ring_area).sum();
    (unsigned_ring_area(polygon.exterior()) - holes).max(0.0)
}

/// Aire (m²) d'un multipolygone, chaque morceau compté en valeur absolue
pub fn multi_polygon_area(multi: &MultiPolygon) -> f64 {
    multi.0.iter().map(polygon_area).sum()
}

fn half_colatitude_tan(lat_deg: f64) -> f64 {
    ((FRAC_PI_2 - lat_deg.to_radians()) / 2.0).tan()
}

fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, polygon};

    fn square(x0: f64, y0: f64, dx: f64, dy: f64) -> Vec<Coord> {
        vec![
            coord! { x: x0, y: y0 },
            coord! { x: x0 + dx, y: y0 },
            coord! { x: x0 + dx, y: y0 + dy },
            coord! { x: x0, y: y0 + dy },
            coord! { x: x0, y: y0 },
        ]
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs() * 1e-6;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={} expected={}",
            actual,
            expected
        );
    }

    #[test]
    fn test_degenerate_ring() {
        assert_eq!(signed_ring_area(&[]), 0.0);
        assert_eq!(signed_ring_area(&[coord! { x: 5.0, y: 45.0 }]), 0.0);
        assert_eq!(
            signed_ring_area(&[coord! { x: 5.0, y: 45.0 }, coord! { x: 5.1, y: 45.1 }]),
            0.0
        );
    }

    #[test]
    fn test_small_square_near_grenoble() {
        let ring = square(5.0, 45.0, 0.001, 0.001);
        assert_close(signed_ring_area(&ring), 8742.83706028735);
    }

    #[test]
    fn test_reversed_ring_flips_sign() {
        let ring = square(2.35, 48.85, 0.0004, 0.0002);
        let mut reversed = ring.clone();
        reversed.reverse();

        let forward = signed_ring_area(&ring);
        let backward = signed_ring_area(&reversed);
        assert!(forward > 0.0);
        assert_close(backward, -forward);
    }

    #[test]
    fn test_antimeridian_crossing() {
        let wrapped = vec![
            coord! { x: 179.9995, y: -17.5 },
            coord! { x: -179.9995, y: -17.5 },
            coord! { x: -179.9995, y: -17.499 },
            coord! { x: 179.9995, y: -17.499 },
            coord! { x: 179.9995, y: -17.5 },
        ];
        let shifted = square(-0.0005, -17.5, 0.001, 0.001);

        assert_close(signed_ring_area(&wrapped), signed_ring_area(&shifted));
    }

    #[test]
    fn test_radius_scaling() {
        let ring = square(0.0, 0.0, 1.0, 1.0);
        let unit = signed_ring_area_with_radius(&ring, 1.0);
        assert_close(signed_ring_area(&ring), unit * EARTH_RADIUS * EARTH_RADIUS);
    }

    #[test]
    fn test_polygon_area_subtracts_holes() {
        let outer = polygon![
            exterior: [
                (x: 5.0, y: 45.0),
                (x: 5.002, y: 45.0),
                (x: 5.002, y: 45.002),
                (x: 5.0, y: 45.002),
                (x: 5.0, y: 45.0),
            ],
            interiors: [[
                (x: 5.0005, y: 45.0005),
                (x: 5.0005, y: 45.0015),
                (x: 5.0015, y: 45.0015),
                (x: 5.0015, y: 45.0005),
                (x: 5.0005, y: 45.0005),
            ]]
        ];

        let exterior = signed_ring_area(&outer.exterior().0).abs();
        let hole = signed_ring_area(&outer.interiors()[0].0).abs();
        assert_close(polygon_area(&outer), exterior - hole);
    }
}
