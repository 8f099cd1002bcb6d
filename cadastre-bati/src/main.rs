//! Point d'entrée CLI pour cadastre-bati

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::ComputeArgs;

/// Calculer les surfaces bâties de chaque parcelle cadastrale
#[derive(Parser)]
#[command(name = "cadastre-bati")]
#[command(author, version)]
#[command(about = "Calculer les surfaces bâties (dur / léger) de chaque parcelle du cadastre Etalab")]
#[command(long_about = "Croise les bâtiments et les parcelles d'une commune (GeoJSON Etalab), calcule l'aire géodésique des intersections et écrit un CSV par parcelle.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    compute: ComputeArgs,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!(output = %cli.compute.output.display(), "Calcul des surfaces bâties");
    let report = cli::cmd_compute(&cli.compute)?;

    if !cli.quiet {
        report.display();
    }
    info!("{}", report.summary());

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
