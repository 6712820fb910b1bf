//! Building the asset table by running exiftool over a folder of digitized files.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::info;

use crate::{ErrorContext, ErrorDetail};

/// Name the captured asset table is given.
pub const ASSET_TABLE: &str = "source2.csv";

const TAGS: &[&str] = &[
    "-SourceFile",
    "-Title",
    "-FileName",
    "-FileCreateDate",
    "-PageCount",
    "-FileTypeExtension",
    "-MIMEType",
    "-LayerCount",
];

/// Arguments passed to exiftool, scanning the working directory recursively.
pub fn arguments() -> Vec<&'static str> {
    let mut args = vec!["-csv", "-r"];
    args.extend_from_slice(TAGS);
    args.push(".");
    args
}

/// Run `exiftool` inside `scan_dir` and capture its CSV output as `dest_dir/source2.csv`.
pub fn write_asset_table(
    exiftool: &Path,
    scan_dir: &Path,
    dest_dir: &Path,
) -> Result<PathBuf, crate::Error> {
    let output = dest_dir.join(ASSET_TABLE);
    let ctx = ErrorContext::new(&output);
    let file = std::fs::File::create(&output).map_err(|e| ctx.error(ErrorDetail::Io(e)))?;
    let status = Command::new(exiftool)
        .args(arguments())
        .current_dir(scan_dir)
        .stdout(Stdio::from(file))
        .status()
        .map_err(|source| {
            ctx.error(ErrorDetail::SpawnExtractor {
                program: exiftool.display().to_string(),
                source,
            })
        })?;
    if !status.success() {
        return Err(ctx.error(ErrorDetail::ExtractorFailed(status)));
    }
    info!(
        scanned = %scan_dir.display(),
        output = %output.display(),
        "asset table generated"
    );
    Ok(output)
}
