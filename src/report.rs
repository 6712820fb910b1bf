//! Data-quality findings accumulated during a run and rendered as text reports.
//!
//! Nothing here fails a run; structural errors go through [`crate::Error`].

use std::{
    collections::HashSet,
    fmt::Write as _,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use itertools::Itertools;

use crate::{ErrorContext, ErrorDetail, normalize, record::ProductRow, table::AssetTable};

/// A description record that matched no asset and had no compound siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub row: usize,
    pub reference_code: String,
    pub locator: String,
    pub title: String,
}

/// A record skipped because its id was already emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    pub row: usize,
    pub id: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    pub unmatched: Vec<Unmatched>,
    pub duplicate_ids: Vec<DuplicateId>,
    /// Map mode: synthesized file names with no MIME type in the asset table.
    pub mapping_problems: Vec<String>,
}

/// What a finished run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub product: PathBuf,
    pub rows: usize,
    /// Unmatched records (archives) or failed MIME lookups (maps).
    pub problems: usize,
    pub unused_assets: usize,
}

/// A product row with empty cells that passes the parent-pointer filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankRow<'r> {
    pub row: usize,
    pub fields: Vec<&'r str>,
    pub values: IndexMap<&'r str, &'r str>,
}

/// Rows with blank cells, reported only when the two parent pointers are both
/// blank or both populated. A row with exactly one pointer set is never
/// reported, whatever else is blank.
pub fn blank_rows<'r>(rows: &'r [ProductRow], header: &[&'r str]) -> Vec<BlankRow<'r>> {
    rows.iter()
        .filter(|row| row.member_of_existing_entity_id.is_empty() == row.member_of.is_empty())
        .filter_map(|row| {
            let values = header
                .iter()
                .copied()
                .zip(row.values())
                .collect::<IndexMap<_, _>>();
            let fields = values
                .iter()
                .filter(|(_, value)| value.is_empty())
                .map(|(name, _)| *name)
                .collect::<Vec<_>>();
            (!fields.is_empty()).then(|| BlankRow {
                row: row.source_row,
                fields,
                values,
            })
        })
        .collect()
}

/// `error.txt`: unmatched records, then rows with blank fields.
pub fn render_error_report(diagnostics: &Diagnostics, blanks: &[BlankRow<'_>]) -> String {
    let mut out = String::new();
    out.push_str("Rows from source1.csv that could not be matched to source2.csv:\n");
    for unmatched in &diagnostics.unmatched {
        let _ = writeln!(
            out,
            "Row {}: referenceCode={}, physicalObjectLocation={}, title={}",
            unmatched.row, unmatched.reference_code, unmatched.locator, unmatched.title
        );
    }
    out.push_str("\nRows in product.csv with blank fields:\n");
    for blank in blanks {
        let _ = writeln!(
            out,
            "Row {} is missing fields: {}",
            blank.row,
            blank.fields.iter().join(", ")
        );
        let _ = writeln!(out, "Values: {:?}", blank.values);
    }
    if !diagnostics.duplicate_ids.is_empty() {
        out.push_str("\nRows skipped because their ID was already written:\n");
        for duplicate in &diagnostics.duplicate_ids {
            let _ = writeln!(out, "Row {}: ID={}", duplicate.row, duplicate.id);
        }
    }
    out
}

/// `mapping_report.txt`, or `None` when there is nothing to report.
pub fn render_mapping_report(diagnostics: &Diagnostics) -> Option<String> {
    if diagnostics.mapping_problems.is_empty() {
        return None;
    }
    let mut out = String::from("Mapping issues encountered during processing:\n");
    for problem in &diagnostics.mapping_problems {
        let _ = writeln!(out, "{problem}");
    }
    Some(out)
}

/// `SourceFile`s whose basename no `digital_file` refers to, in table order.
pub fn unused_assets<'a, 'd>(
    assets: &'a AssetTable,
    digital_files: impl IntoIterator<Item = &'d str>,
) -> Vec<&'a str> {
    let used = digital_files
        .into_iter()
        .filter(|uri| !uri.is_empty())
        .map(normalize::basename)
        .collect::<HashSet<_>>();
    assets
        .iter()
        .map(|asset| asset.source_file.as_str())
        .filter(|source| !source.is_empty() && !used.contains(normalize::basename(source)))
        .collect()
}

/// `missing_metadata.txt`.
pub fn render_missing_metadata(unused: &[&str]) -> String {
    if unused.is_empty() {
        return "All SourceFile entries in source2.csv were matched in product.csv.\n".into();
    }
    let mut out = String::from(concat!(
        "The following SourceFile(s) in source2.csv ",
        "did not match any digital_file in product.csv:\n",
    ));
    for source in unused {
        let _ = writeln!(out, "{source}");
    }
    out
}

pub fn write_report(path: &Path, content: &str) -> Result<(), crate::Error> {
    std::fs::write(path, content).map_err(|e| ErrorContext::new(path).error(ErrorDetail::Io(e)))
}
