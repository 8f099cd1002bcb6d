//! # bati
//!
//! Surfaces bâties par parcelle cadastrale.
//!
//! ## Features
//!
//! - Décomposition des MultiPolygon en polygones simples
//! - Aire géodésique sur sphère (rayon moyen 6 371 009 m)
//! - Intersection bâtiments/parcelles avec index spatial R-tree
//! - Classement bâti dur / léger / inconnu
//! - Calcul parallèle par parcelle avec `rayon`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bati::{compute, PipelineOptions};
//!
//! let computation = compute(&buildings, &parcels, &PipelineOptions::default())?;
//! println!("Parcelles bâties: {}", computation.summary.built_parcels);
//!
//! for record in &computation.records {
//!     println!("{}{}: {:.1} m²", record.section, record.numero, record.built_area);
//! }
//! ```

pub mod aggregate;
pub mod area;
pub mod assemble;
pub mod classify;
pub mod decompose;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod types;

pub use aggregate::ParcelAccumulator;
pub use area::{signed_ring_area, EARTH_RADIUS};
pub use error::BatiError;
pub use overlay::{Contribution, IntersectionOutcome, MIN_SIGNIFICANT_AREA};
pub use pipeline::{compute, Computation, ExecutionMode, Pipeline, PipelineOptions};
pub use types::{
    BuildingFeature, BuildingPolygon, ConstructionType, ErrorTally, Field, ParcelFeature,
    ParcelRecord, Properties, RunSummary, SENTINEL,
};
