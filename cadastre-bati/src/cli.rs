//! Définition et implémentation de la commande de calcul

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use bati::{ExecutionMode, PipelineOptions};
use clap::Args;
use tracing::{info, warn};

use cadastre_bati::config::OutputConfig;
use cadastre_bati::export::export_to_csv;
use cadastre_bati::ingest::{self, InputFiles};
use cadastre_bati::report::RunReport;

#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// GeoJSON des bâtiments (`*batiments.json`)
    #[arg(short, long, required_unless_present = "dir", requires = "parcelles")]
    pub batiments: Option<PathBuf>,

    /// GeoJSON des parcelles (`*parcelles.json`)
    #[arg(short, long, required_unless_present = "dir", requires = "batiments")]
    pub parcelles: Option<PathBuf>,

    /// Dossier contenant un `*batiments.json` et un `*parcelles.json`
    #[arg(short, long, conflicts_with_all = ["batiments", "parcelles"])]
    pub dir: Option<PathBuf>,

    /// Fichier CSV produit
    #[arg(short, long, default_value = "cadastre.csv")]
    pub output: PathBuf,

    /// Config preset name (excel/gdocs/csv) or path to a JSON config
    #[arg(long, default_value = "excel")]
    pub config: String,

    /// Séparateur de champs (prioritaire sur CADASTRE_BATI_SEPARATOR)
    #[arg(long)]
    pub separator: Option<String>,

    /// Nombre de threads du calcul (défaut : tous les coeurs)
    #[arg(long, alias = "threads")]
    pub jobs: Option<usize>,

    /// Calcul sur un seul thread
    #[arg(long, conflicts_with = "jobs")]
    pub sequential: bool,

    /// Écrire le rapport JSON dans ce fichier
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl ComputeArgs {
    fn inputs(&self) -> Result<InputFiles> {
        match (&self.dir, &self.batiments, &self.parcelles) {
            (Some(dir), _, _) => ingest::discover_inputs(dir),
            (None, Some(buildings), Some(parcels)) => Ok(InputFiles {
                buildings: buildings.clone(),
                parcels: parcels.clone(),
            }),
            _ => anyhow::bail!("Either --dir or both --batiments and --parcelles are required"),
        }
    }

    fn options(&self) -> PipelineOptions {
        PipelineOptions {
            mode: if self.sequential {
                ExecutionMode::Sequential
            } else {
                ExecutionMode::Parallel
            },
            jobs: self.jobs.filter(|&n| n > 0),
        }
    }
}

/// Exécute le calcul complet : lecture, intersection, CSV et rapport
pub fn cmd_compute(args: &ComputeArgs) -> Result<RunReport> {
    let started_at = Instant::now();

    let config = OutputConfig::resolve(&args.config)
        .with_context(|| format!("Invalid config: {}", args.config))?
        .with_env_and_cli(args.separator.as_deref());

    let inputs = args.inputs()?;
    info!(
        batiments = %inputs.buildings.display(),
        parcelles = %inputs.parcels.display(),
        "Loading inputs"
    );

    let buildings = ingest::load_buildings(&inputs.buildings)?;
    let parcels = ingest::load_parcels(&inputs.parcels)?;

    let options = args.options();
    info!(mode = ?options.mode, jobs = ?options.jobs, "Computing built surfaces");
    let computation = bati::compute(&buildings, &parcels, &options)?;

    export_to_csv(&computation.records, &config, &args.output)?;
    info!(
        output = %args.output.display(),
        records = computation.records.len(),
        "CSV written"
    );

    let mut report = RunReport::new(&source_label(&inputs.parcels), &computation.summary);
    report.set_duration(started_at.elapsed());

    if report.errors.total() > 0 {
        warn!(
            geometry = report.errors.geometry,
            attributes = report.errors.attributes,
            "Some parcels have errors"
        );
    }

    if let Some(path) = &args.report {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(report)
}

/// Nom du fichier des parcelles sans le suffixe, ex. `cadastre-38185`
fn source_label(parcels: &Path) -> String {
    parcels
        .file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.trim_end_matches("parcelles.json").trim_end_matches(['-', '_', '.']))
        .filter(|label| !label.is_empty())
        .unwrap_or("parcelles")
        .to_string()
}
