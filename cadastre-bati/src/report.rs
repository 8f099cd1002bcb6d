//! Rapport de calcul avec dégradation gracieuse
//!
//! Les erreurs par parcelle ne bloquent pas le calcul : elles sont
//! seulement comptées, et le rapport en donne le bilan.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use bati::{ErrorTally, RunSummary};
use serde::Serialize;

/// Statut global du calcul
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Calcul réussi sans erreur
    Success,
    /// Calcul réussi avec des erreurs non-fatales
    PartialSuccess,
    /// Aucune parcelle traitée
    Failed,
}

/// Rapport complet d'un calcul
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Libellé de la source (commune, dossier...)
    pub source: String,
    /// Durée du calcul
    pub duration_secs: f64,
    /// Statut global
    pub status: RunStatus,

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
    /// Surface cadastrée déclarée (m²)
    pub declared_surface: f64,
    /// Surface bâtie calculée (m²)
    pub built_surface: f64,
    /// Part bâtie de la surface cadastrée
    pub built_ratio: f64,
}

impl RunReport {
    /// Crée un rapport depuis le résumé d'un calcul
    pub fn new(source: &str, summary: &RunSummary) -> Self {
        let mut report = Self {
            source: source.to_string(),
            duration_secs: 0.0,
            status: RunStatus::Success,
            buildings: summary.buildings,
            building_polygons: summary.building_polygons,
            parcels: summary.parcels,
            built_parcels: summary.built_parcels,
            errors: summary.errors,
            declared_surface: summary.declared_surface,
            built_surface: summary.built_surface,
            built_ratio: summary.built_ratio(),
        };
        report.finalize();
        report
    }

    /// Définit la durée du calcul
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final basé sur les erreurs
    pub fn finalize(&mut self) {
        self.status = if self.parcels == 0 {
            RunStatus::Failed
        } else if self.errors.total() > 0 {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "-".repeat(60));
        println!("Calcul terminé avec {} erreur(s)", self.errors.total());
        println!("{}", "-".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!(
            "Batiments : {} ({} polygones), parcelles : {}, dont baties : {}.",
            self.buildings, self.building_polygons, self.parcels, self.built_parcels
        );
        println!(
            "Surface cadastrée : {:.3} km², surface batie : {:.3} km² ({:.2} %)",
            self.declared_surface / 1_000_000.0,
            self.built_surface / 1_000_000.0,
            self.built_ratio * 100.0
        );

        if self.errors.total() > 0 {
            println!(
                "Erreurs : {} géométriques, {} attributs",
                self.errors.geometry, self.errors.attributes
            );
        }

        println!("{}", "-".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} parcels, {} built, {:.1} m² built, {} errors",
            self.source,
            self.parcels,
            self.built_parcels,
            self.built_surface,
            self.errors.total()
        )
    }
}
