use std::path::PathBuf;

use anyhow::{Context, bail};
use archive_reconcile::{
    config::{EntityType, RunConfig},
    maps::MapsRun,
    operator,
    progress::{BatchPhase, create_reporter},
    reconcile::{ArchivesRun, AssetSource},
    table::exiftool::ASSET_TABLE,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

#[derive(Parser)]
struct Opts {
    /// YAML run configuration
    #[clap(short, long, env = "ARCHIVE_RECONCILE_CONFIG")]
    config: Option<PathBuf>,
    /// Ask collection and agent questions on the terminal
    #[clap(short, long)]
    interactive: bool,
    #[clap(subcommand)]
    mode: Mode,
}

#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    Person,
    Organization,
}

impl From<Entity> for EntityType {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Person => EntityType::Person,
            Entity::Organization => EntityType::Organization,
        }
    }
}

#[derive(Subcommand)]
enum Mode {
    /// Reconcile an AtoM export with the digitized files
    Archives {
        /// Folder holding the export zip; outputs are written here
        #[clap(short, long)]
        dest: PathBuf,
        /// Folder of digitized files to scan with exiftool
        #[clap(short, long, conflicts_with = "assets")]
        source: Option<PathBuf>,
        /// Existing exiftool CSV (defaults to source2.csv in the destination)
        #[clap(long)]
        assets: Option<PathBuf>,
        /// Existing description CSV instead of extracting the zip
        #[clap(long)]
        descriptions: Option<PathBuf>,
        /// Repository collection new objects belong to
        #[clap(short, long)]
        parent: Option<String>,
        #[clap(long, value_enum)]
        entity_type: Option<Entity>,
        /// Agent name used when a record has none
        #[clap(long)]
        uniform_name: Option<String>,
    },
    /// Expand an air-photo catalog into one row per photo
    Maps {
        /// Folder holding source1.csv and optionally source2.csv
        #[clap(short, long)]
        folder: PathBuf,
        /// Product table name
        #[clap(short, long, default_value = "product")]
        output: String,
        /// Folder of images to scan when source2.csv is missing
        #[clap(short, long)]
        source: Option<PathBuf>,
        #[clap(short, long)]
        parent: Option<String>,
    },
}

fn load_config(opts: &Opts) -> anyhow::Result<RunConfig> {
    let mut config = match &opts.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("load config from {}", path.display()))?,
        None => RunConfig::default(),
    };
    config.interactive |= opts.interactive;
    Ok(config)
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let mut config = load_config(&opts)?;
    let progress = create_reporter(config.interactive);
    let result = match opts.mode {
        Mode::Archives {
            dest,
            source,
            assets,
            descriptions,
            parent,
            entity_type,
            uniform_name,
        } => {
            if let Some(parent) = parent {
                config.default_parent_id = parent;
            }
            if let Some(entity_type) = entity_type {
                config.entity_type = entity_type.into();
            }
            if uniform_name.is_some() {
                config.uniform_agent_name = uniform_name;
            }
            let assets = match (source, assets) {
                (Some(folder), _) => AssetSource::Scan(folder),
                (None, Some(table)) => AssetSource::Table(table),
                (None, None) if dest.join(ASSET_TABLE).is_file() => {
                    AssetSource::Table(dest.join(ASSET_TABLE))
                }
                (None, None) => bail!("either --source or --assets is required"),
            };
            let run = ArchivesRun {
                dest,
                descriptions,
                assets,
            };
            let operator = operator::for_config(&config);
            archive_reconcile::run_archives(&config, &run, operator.as_ref(), progress.as_ref())
                .context("archives run")
        }
        Mode::Maps {
            folder,
            output,
            source,
            parent,
        } => {
            if let Some(parent) = parent {
                config.maps.default_parent_id = parent;
            }
            let run = MapsRun {
                folder,
                output,
                scan: source,
            };
            archive_reconcile::run_maps(&config, &run, progress.as_ref()).context("maps run")
        }
    };
    match result {
        Ok(summary) => {
            progress.finish();
            eprintln!("{} generated successfully.", summary.product.display());
            Ok(())
        }
        Err(e) => {
            progress.set_phase(BatchPhase::Failed(format!("{e:#}")));
            Err(e)
        }
    }
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = run(opts) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
