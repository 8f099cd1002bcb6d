//! Croisement des polygones parcelles avec les polygones bâtiments

pub mod index;
pub mod intersection;

pub use index::BuildingIndex;
pub use intersection::{intersect, IntersectionOutcome};

use geo::{Coord, CoordsIter, Polygon};
use tracing::{trace, warn};

use crate::types::{ConstructionType, ErrorTally};

/// Aire minimale (m²) d'une intersection prise en compte
///
/// En dessous, l'intersection est considérée comme du bruit numérique.
pub const MIN_SIGNIFICANT_AREA: f64 = 1.0;

/// Apport d'un bâtiment à la surface bâtie d'une parcelle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    construction: ConstructionType,
    area: f64,
}

impl Contribution {
    /// Retient l'apport seulement si l'aire dépasse [`MIN_SIGNIFICANT_AREA`]
    pub fn significant(construction: ConstructionType, area: f64) -> Option<Self> {
        (area > MIN_SIGNIFICANT_AREA).then_some(Self { construction, area })
    }

    pub fn construction(&self) -> ConstructionType {
        self.construction
    }

    pub fn area(&self) -> f64 {
        self.area
    }
}

/// Résultat du croisement d'un polygone parcelle avec tous les bâtiments
#[derive(Debug, Clone, Default)]
pub struct PolygonOverlay {
    /// Apports significatifs, dans l'ordre des bâtiments
    pub contributions: Vec<Contribution>,
    /// Intersections impossibles à calculer
    pub errors: ErrorTally,
}

/// Croise un polygone parcelle avec les bâtiments de l'index
///
/// Les bâtiments qui se chevauchent entre eux ne sont pas dédoublonnés :
/// chacun apporte sa propre intersection.
pub fn overlay_polygon(parcel: &Polygon, buildings: &BuildingIndex) -> PolygonOverlay {
    let mut result = PolygonOverlay::default();

    if !is_finite_polygon(parcel) {
        warn!("Parcel polygon with non-finite coordinates skipped");
        result.errors.record_geometry();
        return result;
    }

    for idx in buildings.candidates(parcel) {
        let Some(building) = buildings.get(idx) else {
            continue;
        };

        match intersect(parcel, &building.polygon, idx) {
            IntersectionOutcome::Intersected { area, .. } => {
                match Contribution::significant(building.construction, area) {
                    Some(contribution) => result.contributions.push(contribution),
                    None => trace!(building = idx, area, "Intersection below threshold"),
                }
            }
            IntersectionOutcome::Empty => {}
            IntersectionOutcome::Failed(e) => {
                warn!(building = idx, error = %e, "Intersection skipped");
                result.errors.record(&e);
            }
        }
    }

    result
}

/// Vrai si toutes les coordonnées du polygone sont finies
pub(crate) fn is_finite_polygon(polygon: &Polygon) -> bool {
    polygon
        .coords_iter()
        .all(|Coord { x, y }| x.is_finite() && y.is_finite())
}
