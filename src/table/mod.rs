//! Delimited-text adapters: loading the input tables and writing the product table.

use std::path::Path;

use indexmap::IndexMap;

use crate::{ErrorContext, ErrorDetail, record::DescriptionRecord};

pub mod archive;
mod assets;
pub mod exiftool;

pub use assets::AssetTable;

#[cfg(test)]
pub(crate) use assets::asset;

/// Load the AtoM description table in row order.
pub fn read_descriptions(path: &Path) -> Result<Vec<DescriptionRecord>, crate::Error> {
    let ctx = ErrorContext::new(path);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| ctx.error(ErrorDetail::ReadTable(e)))?;
    reader
        .deserialize()
        .enumerate()
        .map(|(index, record)| {
            record.map_err(|e| ctx.with_row(index + 2).error(ErrorDetail::ReadTable(e)))
        })
        .collect()
}

/// A table read without a schema: the raw header and each row keyed by it.
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn read(path: &Path) -> Result<Self, crate::Error> {
        let ctx = ErrorContext::new(path);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| ctx.error(ErrorDetail::ReadTable(e)))?;
        let mut records = reader.records();
        let header = match records.next() {
            Some(header) => header
                .map_err(|e| ctx.with_row(1).error(ErrorDetail::ReadTable(e)))?
                .iter()
                .map(str::to_owned)
                .collect(),
            None => return Err(ctx.error(ErrorDetail::EmptyHeader)),
        };
        let rows = records
            .enumerate()
            .map(|(index, record)| {
                record
                    .map(|record| record.iter().map(str::to_owned).collect())
                    .map_err(|e| ctx.with_row(index + 2).error(ErrorDetail::ReadTable(e)))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { header, rows })
    }

    /// Rows as header-keyed maps. Missing trailing cells are absent; surplus cells are dropped.
    pub fn keyed_rows(&self) -> impl Iterator<Item = IndexMap<&str, &str>> {
        self.rows.iter().map(|row| {
            self.header
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }
}

/// Write a header and rows to `path`, replacing any existing file.
pub fn write_table<'a, R, I>(path: &Path, header: &[&str], rows: R) -> Result<(), crate::Error>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a str>,
{
    let ctx = ErrorContext::new(path);
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| ctx.error(ErrorDetail::WriteTable(e)))?;
    writer
        .write_record(header)
        .map_err(|e| ctx.error(ErrorDetail::WriteTable(e)))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| ctx.error(ErrorDetail::WriteTable(e)))?;
    }
    writer
        .flush()
        .map_err(|e| ctx.error(ErrorDetail::Io(e)))
}
