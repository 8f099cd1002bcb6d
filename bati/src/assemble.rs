//! Construction de l'enregistrement de sortie d'une parcelle

use serde_json::Value;
use tracing::debug;

use crate::aggregate::ParcelAccumulator;
use crate::types::{ErrorTally, Field, ParcelFeature, ParcelRecord, Properties};
use crate::BatiError;

/// Assemble l'enregistrement d'une parcelle
///
/// Un attribut absent ou mal typé est remplacé par [`Field::Invalid`] et
/// compte une erreur ; le reste de l'enregistrement est produit normalement.
pub fn assemble(
    parcel: &ParcelFeature,
    totals: &ParcelAccumulator,
    errors: &mut ErrorTally,
) -> ParcelRecord {
    let props = parcel.properties.as_ref();

    ParcelRecord {
        section: checked(text_attribute(props, "section"), errors),
        numero: checked(text_attribute(props, "numero"), errors),
        latitude: parcel.centroid.y,
        longitude: parcel.centroid.x,
        surface: checked(integer_attribute(props, "contenance"), errors),
        built_count: totals.built_count,
        built_area: totals.built_area,
        hard_count: totals.hard_count,
        hard_area: totals.hard_area,
        light_count: totals.light_count,
        light_area: totals.light_area,
    }
}

fn checked<T>(value: Result<T, BatiError>, errors: &mut ErrorTally) -> Field<T> {
    match value {
        Ok(v) => Field::Valid(v),
        Err(e) => {
            debug!(error = %e, "Attribute replaced by sentinel");
            errors.record(&e);
            Field::Invalid
        }
    }
}

/// Lit un attribut texte (une chaîne JSON, rien d'autre)
pub fn text_attribute(props: &Properties, name: &'static str) -> Result<String, BatiError> {
    match props.get(name) {
        None | Some(Value::Null) => Err(BatiError::MissingAttribute(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(BatiError::InvalidAttribute {
            name,
            expected: "string",
        }),
    }
}

/// Lit un attribut entier (un nombre JSON entier, rien d'autre)
pub fn integer_attribute(props: &Properties, name: &'static str) -> Result<i64, BatiError> {
    match props.get(name) {
        None | Some(Value::Null) => Err(BatiError::MissingAttribute(name)),
        Some(Value::Number(n)) => n.as_i64().ok_or(BatiError::InvalidAttribute {
            name,
            expected: "integer",
        }),
        Some(_) => Err(BatiError::InvalidAttribute {
            name,
            expected: "integer",
        }),
    }
}
