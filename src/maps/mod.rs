//! Map mode: expand air-photo catalog cards into one product row per photo.

use std::path::PathBuf;

use tracing::info;

use crate::{
    ErrorContext, ErrorDetail,
    config::RunConfig,
    progress::{BatchPhase, ProgressReporter},
    reconcile::MISSING_METADATA_REPORT,
    report::{self, Diagnostics, RunSummary},
    table::{self, AssetTable, archive::DESCRIPTION_TABLE, exiftool},
};

pub mod catalog;
pub mod expand;
pub mod photo_numbers;

pub use expand::{Expander, MapRow};

pub const MAPPING_REPORT: &str = "mapping_report.txt";

/// Inputs and outputs of a map run.
#[derive(Debug, Clone)]
pub struct MapsRun {
    /// Folder holding `source1.csv` and, optionally, `source2.csv`.
    pub folder: PathBuf,
    /// Product table name; `.csv` is appended when missing.
    pub output: String,
    /// Scan this folder with exiftool when `source2.csv` is absent.
    pub scan: Option<PathBuf>,
}

/// `product` -> `product.csv`; empty -> `product.csv`.
pub fn output_file_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "product.csv".into()
    } else if name.to_lowercase().ends_with(".csv") {
        name.into()
    } else {
        format!("{name}.csv")
    }
}

/// Run map mode end to end.
pub fn run_maps(
    config: &RunConfig,
    run: &MapsRun,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary, crate::Error> {
    let ctx = ErrorContext::new(&run.folder);
    let cards_path = run.folder.join(DESCRIPTION_TABLE);
    if !cards_path.is_file() {
        return Err(ctx.error(ErrorDetail::MissingTable(DESCRIPTION_TABLE)));
    }
    let mut assets_path = run.folder.join(exiftool::ASSET_TABLE);
    if !assets_path.is_file() {
        let Some(scan) = &run.scan else {
            return Err(ctx.error(ErrorDetail::MissingTable(exiftool::ASSET_TABLE)));
        };
        progress.set_phase(BatchPhase::ExtractingMetadata);
        assets_path = exiftool::write_asset_table(&config.exiftool, scan, &run.folder)?;
    }

    progress.set_phase(BatchPhase::LoadingTables);
    let cards = catalog::read_cards(&cards_path)?;
    let assets = AssetTable::load(&assets_path)?;
    info!(cards = cards.len(), assets = assets.len(), "tables loaded");

    progress.set_phase(BatchPhase::ExpandingCatalog);
    progress.register_entries(cards.len());
    let mut diagnostics = Diagnostics::default();
    let expander = Expander {
        assets: &assets,
        uri_prefix: &config.map_uri_prefix,
        physical_location: &config.maps.physical_location,
        parent_id: &config.maps.default_parent_id,
    };
    let rows = expander.expand(&cards, &mut diagnostics);

    progress.set_phase(BatchPhase::WritingReports);
    let product = run.folder.join(output_file_name(&run.output));
    table::write_table(&product, &MapRow::HEADER, rows.iter().map(MapRow::values))?;
    match report::render_mapping_report(&diagnostics) {
        Some(text) => {
            report::write_report(&run.folder.join(MAPPING_REPORT), &text)?;
            progress.log_warn(&format!(
                "{} mapping issues written to {MAPPING_REPORT}",
                diagnostics.mapping_problems.len()
            ));
        }
        None => progress.log_info("No mapping issues encountered."),
    }
    let unused = report::unused_assets(&assets, rows.iter().map(|row| row.digital_file.as_str()));
    report::write_report(
        &run.folder.join(MISSING_METADATA_REPORT),
        &report::render_missing_metadata(&unused),
    )?;

    let summary = RunSummary {
        product,
        rows: rows.len(),
        problems: diagnostics.mapping_problems.len(),
        unused_assets: unused.len(),
    };
    info!(
        product = %summary.product.display(),
        rows = summary.rows,
        mapping_issues = summary.problems,
        unused_assets = summary.unused_assets,
        "map run finished"
    );
    progress.set_phase(BatchPhase::Completed);
    Ok(summary)
}
