use std::path::Path;

use indexmap::IndexMap;
use tempfile::TempDir;

use crate::config::RunConfig;

mod archives;
mod maps;

/// Copy fixture files into a fresh temporary folder.
fn stage(fixture_dir: &str, files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        std::fs::copy(Path::new(fixture_dir).join(file), dir.path().join(file)).unwrap();
    }
    dir
}

fn load_config(path: &str) -> RunConfig {
    RunConfig::load(Path::new(path)).unwrap()
}

/// A written product table as header-keyed rows.
fn read_rows(path: &Path) -> Vec<IndexMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().clone();
    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            header
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .collect()
        })
        .collect()
}
