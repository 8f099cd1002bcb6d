//! Intersection parcelle/bâtiment et mesure de son aire

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use geo::{Area, BooleanOps, Intersects, MultiPolygon, Polygon};

use super::is_finite_polygon;
use crate::area::{multi_polygon_area, polygon_area};
use crate::BatiError;

/// Résultat du croisement d'un polygone parcelle et d'un polygone bâtiment
#[derive(Debug, Clone)]
pub enum IntersectionOutcome {
    /// Intersection non vide, avec son aire géodésique (m²)
    Intersected { geometry: MultiPolygon, area: f64 },
    /// Pas d'intersection, ou intersection d'aire nulle
    Empty,
    /// Calcul impossible (géométrie dégénérée)
    Failed(BatiError),
}

/// Croise un polygone parcelle avec le bâtiment `building_idx`
pub fn intersect(parcel: &Polygon, building: &Polygon, building_idx: usize) -> IntersectionOutcome {
    if !is_finite_polygon(parcel) || !is_finite_polygon(building) {
        return IntersectionOutcome::Failed(BatiError::NonFiniteCoordinate {
            building: building_idx,
        });
    }

    if !parcel.intersects(building) {
        return IntersectionOutcome::Empty;
    }

    // Le balayage de BooleanOps panique sur certaines topologies dégénérées
    // (arêtes confondues, anneaux auto-tangents) : on isole le calcul.
    let geometry = match guarded(building_idx, || parcel.intersection(building)) {
        Ok(geometry) => geometry,
        Err(e) => return IntersectionOutcome::Failed(e),
    };

    if geometry.0.is_empty() || geometry.unsigned_area() == 0.0 {
        return IntersectionOutcome::Empty;
    }

    // Plusieurs morceaux quand le bâtiment traverse la limite plusieurs fois :
    // chaque morceau est compté en valeur absolue.
    let area = if geometry.0.len() > 1 {
        multi_polygon_area(&geometry)
    } else {
        polygon_area(&geometry.0[0])
    };

    if !area.is_finite() {
        return IntersectionOutcome::Failed(BatiError::intersection_failed(
            building_idx,
            "non-finite area",
        ));
    }

    IntersectionOutcome::Intersected { geometry, area }
}

/// Exécute une opération géométrique en convertissant une panique en erreur
///
/// Le hook de panique par défaut reste actif : le message part aussi sur
/// stderr.
fn guarded<T>(building_idx: usize, op: impl FnOnce() -> T) -> Result<T, BatiError> {
    panic::catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
        BatiError::intersection_failed(building_idx, panic_message(payload.as_ref()))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "boolean operation panicked".to_string()
    }
}
