//! In-memory asset table with path, basename and dot-normalized lookup keys.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    ErrorContext, ErrorDetail,
    normalize,
    record::{AssetRecord, RawAsset},
};

/// Every asset of a run, read once and never mutated.
///
/// Keys are kept in insertion order so that tie-breaking by iteration order is
/// reproducible between runs.
#[derive(Debug, Default)]
pub struct AssetTable {
    assets: Vec<AssetRecord>,
    keys: IndexMap<String, usize>,
}

impl AssetTable {
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let ctx = ErrorContext::new(path);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| ctx.error(ErrorDetail::ReadTable(e)))?;
        let mut table = Self::default();
        for (index, raw) in reader.deserialize::<RawAsset>().enumerate() {
            let raw = raw.map_err(|e| ctx.with_row(index + 2).error(ErrorDetail::ReadTable(e)))?;
            table.push(raw);
        }
        debug!(
            path = %path.display(),
            assets = table.assets.len(),
            keys = table.keys.len(),
            "loaded asset table"
        );
        Ok(table)
    }

    pub(crate) fn push(&mut self, raw: RawAsset) {
        let asset = AssetRecord::from_raw(self.assets.len(), raw);
        for key in [asset.source_file.as_str(), asset.file_name.as_str()] {
            if key.is_empty() {
                continue;
            }
            self.keys.insert(key.to_owned(), asset.index);
            let dotted = normalize::dot_for_underscore(key);
            if dotted != key {
                self.keys.insert(dotted, asset.index);
            }
        }
        self.assets.push(asset);
    }

    /// Look up an asset by full path, basename, or dot-normalized alias of either.
    pub fn get(&self, key: &str) -> Option<&AssetRecord> {
        self.keys.get(key).map(|&index| &self.assets[index])
    }

    /// Assets in table order, each exactly once.
    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<RawAsset> for AssetTable {
    fn from_iter<T: IntoIterator<Item = RawAsset>>(iter: T) -> Self {
        let mut table = Self::default();
        iter.into_iter().for_each(|raw| table.push(raw));
        table
    }
}

#[cfg(test)]
pub(crate) fn asset(file_name: &str, mime: &str) -> RawAsset {
    RawAsset {
        source_file: format!("./{file_name}"),
        file_name: file_name.to_owned(),
        mime_type: mime.to_owned(),
        ..Default::default()
    }
}
