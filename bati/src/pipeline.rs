//! Calcul complet : index des bâtiments puis une tâche indépendante par parcelle

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::aggregate::ParcelAccumulator;
use crate::assemble::assemble;
use crate::decompose::{decompose_buildings, polygons_of};
use crate::overlay::{overlay_polygon, BuildingIndex};
use crate::types::{BuildingFeature, ErrorTally, ParcelFeature, ParcelRecord, RunSummary};
use crate::BatiError;

/// Fréquence des logs de progression (en parcelles)
const PROGRESS_STEP: usize = 1000;

/// Mode d'exécution des tâches parcelles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Parallel,
}

/// Options d'exécution
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub mode: ExecutionMode,
    /// Nombre de threads (défaut : pool global rayon)
    pub jobs: Option<usize>,
}

/// Résultat d'une parcelle : son enregistrement et ses erreurs locales
#[derive(Debug, Clone)]
pub struct ParcelOutcome {
    pub record: ParcelRecord,
    pub totals: ParcelAccumulator,
    pub errors: ErrorTally,
}

/// Résultat complet d'un calcul
#[derive(Debug, Clone)]
pub struct Computation {
    /// Un enregistrement par parcelle, dans l'ordre d'entrée
    pub records: Vec<ParcelRecord>,
    pub summary: RunSummary,
}

/// Bâtiments décomposés et indexés, partagés en lecture seule
pub struct Pipeline {
    index: BuildingIndex,
    building_count: usize,
}

impl Pipeline {
    pub fn new(buildings: &[BuildingFeature]) -> Self {
        let polygons = decompose_buildings(buildings);
        info!(
            buildings = buildings.len(),
            polygons = polygons.len(),
            "Buildings decomposed"
        );

        Self {
            index: BuildingIndex::new(polygons),
            building_count: buildings.len(),
        }
    }

    /// Calcule une parcelle, sans aucun état partagé
    pub fn process_parcel(&self, parcel: &ParcelFeature) -> ParcelOutcome {
        let mut errors = ErrorTally::default();
        let mut totals = ParcelAccumulator::new();

        for polygon in polygons_of(&parcel.geometry) {
            let overlay = overlay_polygon(&polygon, &self.index);
            totals.extend(overlay.contributions);
            errors = errors.merge(overlay.errors);
        }

        let record = assemble(parcel, &totals, &mut errors);

        ParcelOutcome {
            record,
            totals,
            errors,
        }
    }

    /// Calcule toutes les parcelles et le résumé
    pub fn run(
        &self,
        parcels: &[ParcelFeature],
        options: &PipelineOptions,
    ) -> Result<Computation, BatiError> {
        let processed = AtomicUsize::new(0);
        let total = parcels.len();

        let task = |parcel: &ParcelFeature| {
            let outcome = self.process_parcel(parcel);
            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_STEP == 0 {
                info!(processed = done, total, "Overlay progress");
            }
            outcome
        };

        let outcomes: Vec<ParcelOutcome> = match (options.mode, options.jobs) {
            (ExecutionMode::Sequential, _) => parcels.iter().map(task).collect(),
            (ExecutionMode::Parallel, None) => parcels.par_iter().map(task).collect(),
            (ExecutionMode::Parallel, Some(jobs)) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| BatiError::ThreadPool(e.to_string()))?;
                pool.install(|| parcels.par_iter().map(task).collect())
            }
        };

        Ok(self.finish(outcomes))
    }

    /// Réduit les résultats dans l'ordre des parcelles
    ///
    /// La réduction est séquentielle pour que les sommes flottantes soient
    /// identiques d'une exécution à l'autre, quel que soit le mode.
    fn finish(&self, outcomes: Vec<ParcelOutcome>) -> Computation {
        let mut summary = RunSummary {
            buildings: self.building_count,
            building_polygons: self.index.len(),
            parcels: outcomes.len(),
            ..Default::default()
        };

        // Bâtiments inexploitables : une erreur chacun, rattachée au calcul
        for _ in 0..self.index.skipped() {
            summary.errors.record_geometry();
        }

        let mut records = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            summary.errors = summary.errors.merge(outcome.errors);
            if outcome.totals.is_built() {
                summary.built_parcels += 1;
                summary.built_surface += outcome.totals.built_area;
            }
            if let Some(&surface) = outcome.record.surface.as_valid() {
                summary.declared_surface += surface as f64;
            }
            records.push(outcome.record);
        }

        debug!(
            parcels = summary.parcels,
            built = summary.built_parcels,
            errors = summary.error_count(),
            "Computation finished"
        );

        Computation { records, summary }
    }
}

/// Raccourci : décompose, indexe et calcule en une fois
pub fn compute(
    buildings: &[BuildingFeature],
    parcels: &[ParcelFeature],
    options: &PipelineOptions,
) -> Result<Computation, BatiError> {
    Pipeline::new(buildings).run(parcels, options)
}
