use anyhow::Result;
use clap::Parser;
use devotions::config::{Config, resolve_paths};
use devotions::db::Database;
use devotions::devotions::Devotions;
use devotions::seed::{read_records, seed};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Load a fixed set of devotions into the database")]
struct Cli {
    /// JSON array of devotion records
    #[arg(short, long)]
    file: PathBuf,
    #[arg(short = 'c', long = "config")]
    config_path: Option<String>,
}

async fn run(cli: Cli) -> Result<usize> {
    let (config_path, data_dir) = resolve_paths(cli.config_path.as_deref());
    let cfg = Config::load(&config_path)?;
    if cfg.app.remote().is_none() {
        std::fs::create_dir_all(&data_dir)?;
    }

    let records = read_records(&cli.file)?;
    let db = Database::new(&cfg, &data_dir).await?;
    seed(&Devotions::new(db.connection()), records).await
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    devotions::init_tracing();

    match run(cli).await {
        Ok(count) => tracing::info!(count, "seeding complete!"),
        Err(e) => {
            tracing::error!(error = ?e, "seeding failed");
            std::process::exit(1);
        }
    }
}
