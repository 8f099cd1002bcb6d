//! Lecture des GeoJSON du cadastre Etalab (`*batiments.json`, `*parcelles.json`)

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use bati::{BuildingFeature, ParcelFeature, Properties};
use geo::{Centroid, Geometry};
use geojson::{FeatureCollection, GeoJson};
use tracing::{debug, info};

/// Paire de fichiers d'entrée d'une commune
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub buildings: PathBuf,
    pub parcels: PathBuf,
}

/// Lit les bâtiments depuis un fichier GeoJSON
pub fn load_buildings(path: &Path) -> Result<Vec<BuildingFeature>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let buildings =
        parse_buildings(&content).with_context(|| format!("Invalid buildings file {}", path.display()))?;
    info!(path = %path.display(), count = buildings.len(), "Buildings loaded");
    Ok(buildings)
}

/// Lit les parcelles depuis un fichier GeoJSON
pub fn load_parcels(path: &Path) -> Result<Vec<ParcelFeature>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parcels =
        parse_parcels(&content).with_context(|| format!("Invalid parcels file {}", path.display()))?;
    info!(path = %path.display(), count = parcels.len(), "Parcels loaded");
    Ok(parcels)
}

/// Convertit une FeatureCollection de bâtiments
pub fn parse_buildings(content: &str) -> Result<Vec<BuildingFeature>> {
    read_features(content)?
        .map(|item| {
            let (properties, geometry) = item?;
            Ok(BuildingFeature::new(properties, geometry))
        })
        .collect()
}

/// Convertit une FeatureCollection de parcelles, avec calcul du centroïde
pub fn parse_parcels(content: &str) -> Result<Vec<ParcelFeature>> {
    read_features(content)?
        .enumerate()
        .map(|(i, item)| {
            let (properties, geometry) = item?;
            let centroid = geometry
                .centroid()
                .ok_or_else(|| anyhow!("Parcel #{} has an empty geometry", i))?;
            Ok(ParcelFeature::new(properties, geometry, centroid.0))
        })
        .collect()
}

fn read_features(
    content: &str,
) -> Result<impl Iterator<Item = Result<(Properties, Geometry)>>> {
    let geojson: GeoJson = content.parse().context("Failed to parse GeoJSON")?;
    let collection = FeatureCollection::try_from(geojson)
        .context("Expected a GeoJSON FeatureCollection")?;
    debug!(features = collection.features.len(), "FeatureCollection parsed");

    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let geometry = feature
                .geometry
                .ok_or_else(|| anyhow!("Feature #{} has no geometry", i))?;
            let geometry = Geometry::<f64>::try_from(geometry)
                .with_context(|| format!("Feature #{} has an unsupported geometry", i))?;
            Ok((feature.properties.unwrap_or_default(), geometry))
        }))
}

/// Cherche `*batiments.json` et `*parcelles.json` dans un dossier
///
/// Le dossier doit contenir exactement un fichier de chaque sorte.
pub fn discover_inputs(dir: &Path) -> Result<InputFiles> {
    let mut buildings = Vec::new();
    let mut parcels = Vec::new();

    for entry in std::fs::read_dir(dir).with_context(|| format!("Cannot read {}", dir.display()))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with("batiments.json") {
            buildings.push(path);
        } else if name.ends_with("parcelles.json") {
            parcels.push(path);
        }
    }

    match (buildings.len(), parcels.len()) {
        (1, 1) => Ok(InputFiles {
            buildings: buildings.remove(0),
            parcels: parcels.remove(0),
        }),
        (b, p) => bail!(
            "Expected one *batiments.json and one *parcelles.json in {}, found {} and {}",
            dir.display(),
            b,
            p
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bati::ConstructionType;

    const BATIMENTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"type": "01", "commune": "38185"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[5.0, 45.0], [5.0001, 45.0], [5.0001, 45.0001], [5.0, 45.0001], [5.0, 45.0]]],
                        [[[5.0002, 45.0], [5.0003, 45.0], [5.0003, 45.0001], [5.0002, 45.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[5.0, 45.0], [5.0001, 45.0], [5.0001, 45.0001], [5.0, 45.0]]]
                }
            }
        ]
    }"#;

    const PARCELLES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "381850000AB0012",
                "properties": {"section": "AB", "numero": "12", "contenance": 1000},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[5.0, 45.0], [5.001, 45.0], [5.001, 45.001], [5.0, 45.001], [5.0, 45.0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_buildings() {
        let buildings = parse_buildings(BATIMENTS).unwrap();
        assert_eq!(buildings.len(), 2);
        assert!(matches!(buildings[0].geometry, Geometry::MultiPolygon(_)));
        assert!(matches!(buildings[1].geometry, Geometry::Polygon(_)));
        assert!(buildings[1].properties.is_empty());

        let polygons = bati::decompose::decompose_buildings(&buildings);
        assert_eq!(polygons.len(), 3);
        assert_eq!(polygons[0].construction, ConstructionType::Hard);
        assert_eq!(polygons[2].construction, ConstructionType::Unknown);
    }

    #[test]
    fn test_parse_parcels_computes_centroid() {
        let parcels = parse_parcels(PARCELLES).unwrap();
        assert_eq!(parcels.len(), 1);
        assert!((parcels[0].centroid.x - 5.0005).abs() < 1e-9);
        assert!((parcels[0].centroid.y - 45.0005).abs() < 1e-9);
        assert_eq!(parcels[0].properties["contenance"], 1000);
    }

    #[test]
    fn test_reject_structural_failures() {
        assert!(parse_parcels("not json").is_err());
        assert!(parse_parcels(r#"{"type": "Point", "coordinates": [5.0, 45.0]}"#).is_err());

        let no_geometry = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": null}
        ]}"#;
        assert!(parse_buildings(no_geometry).is_err());
    }

    #[test]
    fn test_discover_inputs() {
        let dir = std::env::temp_dir().join("cadastre_bati_discover");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cadastre-38185-batiments.json"), BATIMENTS).unwrap();
        std::fs::write(dir.join("cadastre-38185-parcelles.json"), PARCELLES).unwrap();

        let inputs = discover_inputs(&dir).unwrap();
        assert!(inputs.buildings.ends_with("cadastre-38185-batiments.json"));
        assert!(inputs.parcels.ends_with("cadastre-38185-parcelles.json"));

        std::fs::remove_dir_all(dir).ok();
    }
}
