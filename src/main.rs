use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ampasamp::app::App;
use ampasamp::config::Config;

#[derive(Parser)]
#[command(
    name = "ampasamp",
    version,
    about = "Samples policy-compliant strings from a text corpus"
)]
struct Cli {
    #[arg(short, long, help = "Corpus file, one candidate per line")]
    database: PathBuf,

    #[arg(short, long, help = "Job file (JSON) to execute")]
    task: PathBuf,

    #[arg(short, long, help = "Directory to write samples into")]
    output_dir: Option<PathBuf>,

    #[arg(short, long, help = "Seed for reproducible shuffles")]
    seed: Option<u64>,

    #[arg(short, long, help = "Config file (defaults to the user config)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Log debug output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.to_string_lossy().to_string();
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let app = App::new(config);
    app.run(&cli.database, &cli.task)?;
    Ok(())
}
