//! Archives mode: reconcile an AtoM description export with an exiftool asset
//! table and write the product table plus its reports.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    config::RunConfig,
    operator::Operator,
    progress::{BatchPhase, ProgressReporter},
    record::ProductRow,
    report::{self, RunSummary},
    table::{self, AssetTable, archive, exiftool},
};

pub mod compound;
pub mod fields;
pub mod resolver;
pub mod side_label;
pub mod synthesize;

pub use synthesize::{IdAllocator, Synthesis, Synthesizer};

pub const PRODUCT_TABLE: &str = "product.csv";
pub const ERROR_REPORT: &str = "error.txt";
pub const MISSING_METADATA_REPORT: &str = "missing_metadata.txt";

/// Where the asset table comes from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Run exiftool over this folder and capture `source2.csv` in the destination.
    Scan(PathBuf),
    /// Read an existing exiftool CSV.
    Table(PathBuf),
}

/// Inputs and output folder of an archives run.
#[derive(Debug, Clone)]
pub struct ArchivesRun {
    /// Folder holding the export bundle; every output is written here.
    pub dest: PathBuf,
    /// Use this description table instead of extracting one from the bundle.
    pub descriptions: Option<PathBuf>,
    pub assets: AssetSource,
}

fn asset_table_path(
    config: &RunConfig,
    run: &ArchivesRun,
    progress: &dyn ProgressReporter,
) -> Result<PathBuf, crate::Error> {
    match &run.assets {
        AssetSource::Scan(folder) => {
            progress.set_phase(BatchPhase::ExtractingMetadata);
            exiftool::write_asset_table(&config.exiftool, folder, &run.dest)
        }
        AssetSource::Table(path) => Ok(path.clone()),
    }
}

fn description_table_path(
    run: &ArchivesRun,
    progress: &dyn ProgressReporter,
) -> Result<PathBuf, crate::Error> {
    match &run.descriptions {
        Some(path) => Ok(path.clone()),
        None => {
            progress.set_phase(BatchPhase::ExtractingArchive);
            archive::extract_description_table(&run.dest)
        }
    }
}

/// Write `product.csv`, `error.txt` and `missing_metadata.txt` into `dest`.
pub fn write_outputs(
    dest: &Path,
    config: &RunConfig,
    assets: &AssetTable,
    synthesis: &Synthesis,
) -> Result<RunSummary, crate::Error> {
    let header = ProductRow::header(config.entity_type.column());
    let product = dest.join(PRODUCT_TABLE);
    table::write_table(&product, &header, synthesis.rows.iter().map(ProductRow::values))?;

    let blanks = report::blank_rows(&synthesis.rows, &header);
    report::write_report(
        &dest.join(ERROR_REPORT),
        &report::render_error_report(&synthesis.diagnostics, &blanks),
    )?;

    let unused = report::unused_assets(
        assets,
        synthesis.rows.iter().map(|row| row.digital_file.as_str()),
    );
    report::write_report(
        &dest.join(MISSING_METADATA_REPORT),
        &report::render_missing_metadata(&unused),
    )?;

    Ok(RunSummary {
        product,
        rows: synthesis.rows.len(),
        problems: synthesis.diagnostics.unmatched.len(),
        unused_assets: unused.len(),
    })
}

/// Run archives mode end to end.
pub fn run_archives(
    config: &RunConfig,
    run: &ArchivesRun,
    operator: &dyn Operator,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary, crate::Error> {
    let assets_path = asset_table_path(config, run, progress)?;
    let descriptions_path = description_table_path(run, progress)?;

    progress.set_phase(BatchPhase::LoadingTables);
    let assets = AssetTable::load(&assets_path)?;
    let records = table::read_descriptions(&descriptions_path)?;
    info!(
        descriptions = records.len(),
        assets = assets.len(),
        "tables loaded"
    );

    progress.set_phase(BatchPhase::Reconciling);
    progress.register_entries(records.len());
    let synthesis = Synthesizer::new(config, operator, &assets, progress).synthesize(&records);

    progress.set_phase(BatchPhase::WritingReports);
    let summary = write_outputs(&run.dest, config, &assets, &synthesis)?;
    if !synthesis.diagnostics.duplicate_ids.is_empty() {
        progress.log_warn(&format!(
            "{} records skipped for duplicate IDs, see {ERROR_REPORT}",
            synthesis.diagnostics.duplicate_ids.len()
        ));
    }
    info!(
        product = %summary.product.display(),
        rows = summary.rows,
        unmatched = summary.problems,
        unused_assets = summary.unused_assets,
        "archives run finished"
    );
    progress.set_phase(BatchPhase::Completed);
    Ok(summary)
}
