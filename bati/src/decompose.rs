//! Décomposition des géométries multi-parties en polygones simples

use geo::{Geometry, Polygon};
use tracing::warn;

use crate::classify::classify;
use crate::types::{BuildingFeature, BuildingPolygon};

/// Aplatit une géométrie en liste de polygones simples
///
/// Polygon → 1, MultiPolygon → un par constituant, GeometryCollection →
/// récursif. Les autres types (points, lignes) ne produisent rien.
pub fn polygons_of(geometry: &Geometry) -> Vec<Polygon> {
    let mut out = Vec::new();
    collect_polygons(geometry, &mut out);
    out
}

fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p.clone()),
        Geometry::MultiPolygon(mp) => out.extend(mp.0.iter().cloned()),
        Geometry::GeometryCollection(gc) => {
            for g in gc.iter() {
                collect_polygons(g, out);
            }
        }
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::Triangle(t) => out.push(t.to_polygon()),
        other => {
            warn!(kind = geometry_kind(other), "Ignoring non-polygonal geometry");
        }
    }
}

/// Décompose les bâtiments en polygones indépendants
///
/// Chaque polygone reçoit son propre type de construction et partage les
/// attributs de sa feature d'origine.
pub fn decompose_buildings(buildings: &[BuildingFeature]) -> Vec<BuildingPolygon> {
    // Les bâtiments Etalab sont presque toujours des MultiPolygon à 1-3 parties
    let mut polygons = Vec::with_capacity(buildings.len() * 3);

    for (feature_index, feature) in buildings.iter().enumerate() {
        for polygon in polygons_of(&feature.geometry) {
            polygons.push(BuildingPolygon {
                feature_index,
                polygon,
                construction: classify(feature.properties.get("type")),
                properties: feature.properties.clone(),
            });
        }
    }

    polygons
}

fn geometry_kind(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConstructionType, Properties};
    use geo::{polygon, GeometryCollection, MultiPolygon, Point};
    use serde_json::json;
    use std::sync::Arc;

    fn unit_square(offset: f64) -> Polygon {
        polygon![
            (x: offset, y: 0.0),
            (x: offset + 1.0, y: 0.0),
            (x: offset + 1.0, y: 1.0),
            (x: offset, y: 1.0),
            (x: offset, y: 0.0),
        ]
    }

    fn props(value: serde_json::Value) -> Properties {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_polygons_of_variants() {
        let single = Geometry::Polygon(unit_square(0.0));
        assert_eq!(polygons_of(&single).len(), 1);

        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![
            unit_square(0.0),
            unit_square(2.0),
            unit_square(4.0),
        ]));
        assert_eq!(polygons_of(&multi).len(), 3);

        let collection = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
            Geometry::Point(Point::new(0.0, 0.0)),
            multi,
        ]));
        assert_eq!(polygons_of(&collection).len(), 3);

        assert!(polygons_of(&Geometry::Point(Point::new(1.0, 1.0))).is_empty());
    }

    #[test]
    fn test_decompose_shares_attributes() {
        let buildings = vec![
            BuildingFeature::new(
                props(json!({"type": "01"})),
                Geometry::MultiPolygon(MultiPolygon::new(vec![
                    unit_square(0.0),
                    unit_square(2.0),
                ])),
            ),
            BuildingFeature::new(props(json!({})), Geometry::Polygon(unit_square(5.0))),
        ];

        let polygons = decompose_buildings(&buildings);
        assert_eq!(polygons.len(), 3);

        assert_eq!(polygons[0].feature_index, 0);
        assert_eq!(polygons[1].feature_index, 0);
        assert_eq!(polygons[2].feature_index, 1);

        assert_eq!(polygons[0].construction, ConstructionType::Hard);
        assert_eq!(polygons[1].construction, ConstructionType::Hard);
        assert_eq!(polygons[2].construction, ConstructionType::Unknown);

        // Pas de copie des attributs entre polygones frères
        assert!(Arc::ptr_eq(&polygons[0].properties, &polygons[1].properties));
        assert!(Arc::ptr_eq(&polygons[0].properties, &buildings[0].properties));
    }
}
