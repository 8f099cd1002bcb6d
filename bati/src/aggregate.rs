//! Cumul des apports par parcelle

use serde::Serialize;

use crate::overlay::Contribution;
use crate::types::ConstructionType;

/// Totaux courants d'une parcelle
///
/// Local à une parcelle : créé à zéro, alimenté pendant son croisement, puis
/// transformé en enregistrement. L'addition est associative et commutative,
/// les apports peuvent donc être cumulés dans n'importe quel ordre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParcelAccumulator {
    pub built_count: usize,
    pub built_area: f64,
    pub hard_count: usize,
    pub hard_area: f64,
    pub light_count: usize,
    pub light_area: f64,
}

impl ParcelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un apport (Unknown ne compte que dans le total)
    pub fn add(&mut self, contribution: Contribution) {
        let area = contribution.area();
        self.built_count += 1;
        self.built_area += area;

        match contribution.construction() {
            ConstructionType::Hard => {
                self.hard_count += 1;
                self.hard_area += area;
            }
            ConstructionType::Light => {
                self.light_count += 1;
                self.light_area += area;
            }
            ConstructionType::Unknown => {}
        }
    }

    /// Fusionne deux cumuls partiels
    pub fn merge(self, other: Self) -> Self {
        Self {
            built_count: self.built_count + other.built_count,
            built_area: self.built_area + other.built_area,
            hard_count: self.hard_count + other.hard_count,
            hard_area: self.hard_area + other.hard_area,
            light_count: self.light_count + other.light_count,
            light_area: self.light_area + other.light_area,
        }
    }

    /// Vrai si au moins un bâtiment a été retenu
    pub fn is_built(&self) -> bool {
        self.built_count > 0
    }
}

impl Extend<Contribution> for ParcelAccumulator {
    fn extend<I: IntoIterator<Item = Contribution>>(&mut self, iter: I) {
        for contribution in iter {
            self.add(contribution);
        }
    }
}

impl FromIterator<Contribution> for ParcelAccumulator {
    fn from_iter<I: IntoIterator<Item = Contribution>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}
