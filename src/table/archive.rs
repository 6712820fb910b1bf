//! Locating and expanding the AtoM export bundle.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{ErrorContext, ErrorDetail};

/// Name the extracted description table is given.
pub const DESCRIPTION_TABLE: &str = "source1.csv";

/// First `*.zip` in `dir` (extension matched case-insensitively), in lexical order.
pub fn find_archive(dir: &Path) -> Result<PathBuf, crate::Error> {
    let ctx = ErrorContext::new(dir);
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy()))
        .join("*.zip")
        .to_string_lossy()
        .into_owned();
    let options = glob::MatchOptions {
        case_sensitive: false,
        ..glob::MatchOptions::new()
    };
    glob::glob_with(&pattern, options)
        .map_err(|e| ctx.error(ErrorDetail::Pattern(e)))?
        .filter_map(Result::ok)
        .find(|path| path.is_file())
        .ok_or_else(|| ctx.error(ErrorDetail::NoArchive))
}

/// Extract the bundle into `dir` and rename the first CSV inside it to [`DESCRIPTION_TABLE`].
pub fn extract_description_table(dir: &Path) -> Result<PathBuf, crate::Error> {
    let archive_path = find_archive(dir)?;
    let ctx = ErrorContext::new(&archive_path);
    let file = std::fs::File::open(&archive_path).map_err(|e| ctx.error(ErrorDetail::Io(e)))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ctx.error(ErrorDetail::Archive(e)))?;
    archive
        .extract(dir)
        .map_err(|e| ctx.error(ErrorDetail::Archive(e)))?;

    let mut csv_name = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| ctx.error(ErrorDetail::Archive(e)))?;
        if !entry.is_dir() && entry.name().to_ascii_lowercase().ends_with(".csv") {
            csv_name = Some(entry.name().to_owned());
            break;
        }
    }
    let csv_name = csv_name.ok_or_else(|| ctx.error(ErrorDetail::NoDescriptionTable))?;

    let extracted = dir.join(&csv_name);
    let target = dir.join(DESCRIPTION_TABLE);
    if extracted != target {
        std::fs::rename(&extracted, &target).map_err(|e| {
            ErrorContext::new(&extracted).error(ErrorDetail::Io(e))
        })?;
    }
    info!(
        archive = %archive_path.display(),
        entry = %csv_name,
        "extracted description table"
    );
    Ok(target)
}
