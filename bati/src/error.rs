//! Types d'erreurs pour le crate bati

use thiserror::Error;

/// Erreurs récupérables rencontrées pendant le calcul d'une parcelle
///
/// Aucune de ces erreurs n'interrompt le calcul : elles sont comptées et
/// la parcelle produit quand même son enregistrement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatiError {
    /// Intersection impossible à calculer (géométrie dégénérée)
    #[error("Intersection failed between parcel polygon and building {building}: {reason}")]
    IntersectionFailed { building: usize, reason: String },

    /// Coordonnée NaN ou infinie dans une géométrie
    #[error("Non-finite coordinate in building {building}")]
    NonFiniteCoordinate { building: usize },

    /// Attribut absent
    #[error("Missing attribute: {0}")]
    MissingAttribute(&'static str),

    /// Attribut présent mais de type inattendu
    #[error("Invalid attribute {name}: expected {expected}")]
    InvalidAttribute {
        name: &'static str,
        expected: &'static str,
    },

    /// Pool de threads impossible à créer
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl BatiError {
    /// Crée une erreur d'intersection avec contexte
    pub fn intersection_failed(building: usize, reason: impl Into<String>) -> Self {
        Self::IntersectionFailed {
            building,
            reason: reason.into(),
        }
    }

    /// Vrai pour les erreurs géométriques (par opposition aux attributs)
    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            Self::IntersectionFailed { .. } | Self::NonFiniteCoordinate { .. }
        )
    }
}
