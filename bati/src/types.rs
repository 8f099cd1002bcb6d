//! Types de données pour le crate bati

use std::fmt;
use std::sync::Arc;

use geo::{Coord, Geometry, Polygon};
use serde::Serialize;

use crate::BatiError;

/// Attributs bruts d'une feature (propriétés GeoJSON)
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Valeur affichée à la place d'un attribut absent ou mal typé
pub const SENTINEL: &str = "erreur";

/// Type de construction d'un bâtiment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ConstructionType {
    /// Type absent ou non reconnu
    #[default]
    Unknown,
    /// Bâti dur (code 1)
    Hard,
    /// Bâti léger (code 2)
    Light,
}

/// Une feature bâtiment telle que livrée par l'ingestion
#[derive(Debug, Clone)]
pub struct BuildingFeature {
    /// Attributs (champ `type` attendu)
    pub properties: Arc<Properties>,

    /// Géométrie (Polygon ou MultiPolygon)
    pub geometry: Geometry,
}

impl BuildingFeature {
    pub fn new(properties: Properties, geometry: Geometry) -> Self {
        Self {
            properties: Arc::new(properties),
            geometry,
        }
    }
}

/// Un polygone simple issu de la décomposition d'un bâtiment
#[derive(Debug, Clone)]
pub struct BuildingPolygon {
    /// Position de la feature d'origine dans la collection
    pub feature_index: usize,

    /// Polygone simple
    pub polygon: Polygon,

    /// Type de construction, classé pour ce polygone
    pub construction: ConstructionType,

    /// Attributs partagés avec les polygones frères
    pub properties: Arc<Properties>,
}

/// Une feature parcelle telle que livrée par l'ingestion
#[derive(Debug, Clone)]
pub struct ParcelFeature {
    /// Attributs (`section`, `numero`, `contenance`)
    pub properties: Arc<Properties>,

    /// Géométrie (Polygon ou MultiPolygon)
    pub geometry: Geometry,

    /// Centroïde précalculé (x = longitude, y = latitude)
    pub centroid: Coord,
}

impl ParcelFeature {
    pub fn new(properties: Properties, geometry: Geometry, centroid: Coord) -> Self {
        Self {
            properties: Arc::new(properties),
            geometry,
            centroid,
        }
    }
}

/// Attribut converti, ou marqueur d'échec de conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field<T> {
    Valid(T),
    Invalid,
}

impl<T> Field<T> {
    pub fn as_valid(&self) -> Option<&T> {
        match self {
            Field::Valid(v) => Some(v),
            Field::Invalid => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Valid(v) => v.fmt(f),
            Field::Invalid => f.write_str(SENTINEL),
        }
    }
}

/// Compteurs d'erreurs d'un calcul, par nature
///
/// Les compteurs ne font qu'augmenter ; la fusion est une somme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ErrorTally {
    /// Intersections impossibles à calculer
    pub geometry: usize,
    /// Attributs absents ou mal typés
    pub attributes: usize,
}

impl ErrorTally {
    /// Compte une erreur dans la catégorie qui lui correspond
    pub fn record(&mut self, error: &BatiError) {
        if error.is_geometric() {
            self.record_geometry();
        } else {
            self.record_attribute();
        }
    }

    pub fn record_geometry(&mut self) {
        self.geometry += 1;
    }

    pub fn record_attribute(&mut self) {
        self.attributes += 1;
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            geometry: self.geometry + other.geometry,
            attributes: self.attributes + other.attributes,
        }
    }

    pub fn total(&self) -> usize {
        self.geometry + self.attributes
    }
}

/// Enregistrement de sortie pour une parcelle, dans l'ordre des colonnes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelRecord {
    pub section: Field<String>,
    pub numero: Field<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Contenance déclarée (m²), jamais calculée
    pub surface: Field<i64>,
    pub built_count: usize,
    pub built_area: f64,
    pub hard_count: usize,
    pub hard_area: f64,
    pub light_count: usize,
    pub light_area: f64,
}

/// Statistiques globales d'un calcul
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Features bâtiments lues
    pub buildings: usize,
    /// Polygones bâtiments après décomposition
    pub building_polygons: usize,
    /// Parcelles traitées
    pub parcels: usize,
    /// Parcelles avec au moins un bâtiment
    pub built_parcels: usize,
    /// Erreurs par nature
    pub errors: ErrorTally,
    /// Somme des contenances déclarées (m²)
    pub declared_surface: f64,
    /// Somme des surfaces bâties calculées (m²)
    pub built_surface: f64,
}

impl RunSummary {
    pub fn error_count(&self) -> usize {
        self.errors.total()
    }

    /// Part de la surface cadastrée qui est bâtie (0 si aucune surface déclarée)
    pub fn built_ratio(&self) -> f64 {
        if self.declared_surface > 0.0 {
            self.built_surface / self.declared_surface
        } else {
            0.0
        }
    }
}
