//! # cadastre-bati
//!
//! Surfaces bâties par parcelle à partir des GeoJSON du cadastre Etalab.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Fichiers explicites, CSV pour Excel
//! cadastre-bati --batiments cadastre-38185-batiments.json \
//!     --parcelles cadastre-38185-parcelles.json --output grenoble.csv
//!
//! # Dossier d'une commune, tabulations, rapport JSON
//! cadastre-bati --dir ./38185/ --config gdocs --report report.json
//! ```

pub mod config;
pub mod export;
pub mod ingest;
pub mod report;

pub use config::OutputConfig;
pub use report::{RunReport, RunStatus};
