//! Point d'entrée CLI pour geocoord

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use geocoord_cli::cli::{self, Commands};
use geocoord_cli::config::Config;

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

/// Calculs géodésiques : distances, projections, conversions UTM
#[derive(Parser)]
#[command(name = "geocoord")]
#[command(author, version)]
#[command(about = "Calculs géodésiques : Vincenty, sphère, UTM")]
#[command(long_about = "Calculs géodésiques en ligne de commande.\n\n\
Les résultats sont écrits en JSON sur stdout, les logs sur stderr.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Preset (wgs84/grs80) ou chemin vers une config JSON (défaut : env GEOCOORD_CONFIG / wgs84)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.config.as_deref())?;
    debug!(name = ?config.name, ellipsoid = ?config.geodesy.ellipsoid, "Configuration chargée");

    cli::run(cli.command, &config)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout reste réservé au JSON
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
