use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use spaces_migrate::config::RunConfig;
use spaces_migrate::{db, migration};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassificationsFrom {
    /// Built-in "Other Spaces" tree
    Defaults,
    /// classifications.json in the import directory
    File,
}

#[derive(Parser, Debug)]
#[command(name = "spaces-migrate")]
#[command(about = "Imports legacy space exports into the space classification model")]
#[command(version)]
struct Args {
    /// Directory holding classifications.json, spaces.json and occupations.json
    #[arg(long, env = "SPACES_IMPORT_DIR")]
    import_dir: PathBuf,

    /// Target SQLite store with the already-migrated spaces
    #[arg(long, env = "SPACES_DATABASE")]
    database: PathBuf,

    /// Source of the classification tree when the store has none
    #[arg(long, value_enum, default_value = "file")]
    classifications: ClassificationsFrom,

    /// Also import occupations.json
    #[arg(long)]
    with_occupations: bool,

    /// Records per transaction
    #[arg(long, default_value_t = spaces_migrate::config::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "spaces_migrate=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut cfg = RunConfig::from_import_dir(
        &args.import_dir,
        args.classifications == ClassificationsFrom::File,
    );
    cfg.with_occupations = args.with_occupations;
    cfg.chunk_size = args.chunk_size;

    info!("import directory {}", args.import_dir.display());
    info!("database {}", args.database.display());

    let mut conn = db::open_db(&args.database)
        .with_context(|| format!("failed to open {}", args.database.display()))?;
    let summary = migration::run(&mut conn, &cfg).context("migration aborted")?;

    info!("done: {:?}", summary);
    Ok(())
}
