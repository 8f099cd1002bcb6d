//! Classification du type de construction depuis l'attribut `type`

use serde_json::Value;

use crate::types::ConstructionType;

impl ConstructionType {
    /// Convertit un code numérique cadastral (1 = dur, 2 = léger)
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ConstructionType::Hard,
            2 => ConstructionType::Light,
            _ => ConstructionType::Unknown,
        }
    }
}

/// Classe la valeur brute de l'attribut `type` d'un bâtiment
///
/// Fonction totale : toute valeur absente, nulle ou illisible donne
/// [`ConstructionType::Unknown`].
pub fn classify(raw: Option<&Value>) -> ConstructionType {
    let code = match raw {
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    };

    code.map(ConstructionType::from_code).unwrap_or_default()
}
