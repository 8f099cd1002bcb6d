//! Index spatial des polygones bâtiments (R-tree sur les emprises)

use geo::{BoundingRect, Polygon, Rect};
use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, warn};

use super::is_finite_polygon;
use crate::types::BuildingPolygon;

/// Emprise d'un polygone bâtiment dans l'index
#[derive(Debug, Clone)]
struct BuildingBox {
    idx: usize, // Position dans `BuildingIndex::polygons`
    bbox: Rect,
}

impl RTreeObject for BuildingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Liste des polygones bâtiments, en lecture seule, indexée par emprise
///
/// Construit une fois, puis partagé entre toutes les parcelles.
#[derive(Debug)]
pub struct BuildingIndex {
    polygons: Vec<BuildingPolygon>,
    rtree: RTree<BuildingBox>,
    /// Polygones écartés de l'index (coordonnée NaN ou infinie)
    skipped: usize,
}

impl BuildingIndex {
    pub fn new(polygons: Vec<BuildingPolygon>) -> Self {
        let mut skipped = 0usize;
        let boxes: Vec<BuildingBox> = polygons
            .iter()
            .enumerate()
            .filter_map(|(idx, building)| match finite_bounding_rect(&building.polygon) {
                Some(bbox) => Some(BuildingBox { idx, bbox }),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            warn!(skipped, "Buildings without a finite bounding box left out of the index");
        }
        debug!(indexed = boxes.len(), "Building index built");

        Self {
            rtree: RTree::bulk_load(boxes),
            polygons,
            skipped,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&BuildingPolygon> {
        self.polygons.get(idx)
    }

    /// Nombre de polygones hors index, chacun compte une erreur géométrique
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Indices des bâtiments dont l'emprise touche celle du polygone
    ///
    /// Triés par ordre croissant, pour reproduire exactement le parcours
    /// naïf de la liste des bâtiments.
    pub fn candidates(&self, polygon: &Polygon) -> Vec<usize> {
        let Some(rect) = finite_bounding_rect(polygon) else {
            return Vec::new();
        };
        let search = AABB::from_corners(rect.min().into(), rect.max().into());

        let mut found: Vec<usize> = self
            .rtree
            .locate_in_envelope_intersecting(&search)
            .map(|b| b.idx)
            .collect();
        found.sort_unstable();
        found
    }
}

fn finite_bounding_rect(polygon: &Polygon) -> Option<Rect> {
    if !is_finite_polygon(polygon) {
        return None;
    }
    polygon.bounding_rect()
}
