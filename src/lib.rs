use std::path::PathBuf;

pub mod config;
pub mod maps;
pub mod normalize;
pub mod operator;
pub mod progress;
pub mod reconcile;
pub mod record;
pub mod report;
pub mod table;

#[cfg(test)]
mod tests;

pub use maps::run_maps;
pub use reconcile::run_archives;

#[derive(Debug, thiserror::Error)]
#[error("{context}: {detail}")]
pub struct Error {
    pub context: Box<ErrorContext>,
    pub detail: Box<ErrorDetail>,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub path: PathBuf,
    pub row: Option<usize>,
}

impl ErrorContext {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            row: None,
        }
    }

    pub(crate) fn with_row(&self, row: usize) -> Self {
        Self {
            path: self.path.clone(),
            row: Some(row),
        }
    }

    pub(crate) fn error(&self, detail: ErrorDetail) -> Error {
        Error {
            context: Box::new(self.clone()),
            detail: Box::new(detail),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.row {
            Some(row) => write!(f, "{} (row {row})", self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorDetail {
    #[error("Failed to read table: {0}")]
    ReadTable(csv::Error),
    #[error("Failed to write table: {0}")]
    WriteTable(csv::Error),
    #[error("I/O error: {0}")]
    Io(std::io::Error),
    #[error("Failed to read archive: {0}")]
    Archive(zip::result::ZipError),
    #[error("Invalid search pattern: {0}")]
    Pattern(glob::PatternError),
    #[error("No zip file found")]
    NoArchive,
    #[error("No CSV file found in the zip archive")]
    NoDescriptionTable,
    #[error("Failed to start {program}: {source}")]
    SpawnExtractor {
        program: String,
        source: std::io::Error,
    },
    #[error("Metadata extractor exited with {0}")]
    ExtractorFailed(std::process::ExitStatus),
    #[error("Failed to parse YAML config: {0}")]
    ParseConfig(serde_yaml::Error),
    #[error("{0} not found")]
    MissingTable(&'static str),
    #[error("Empty table header")]
    EmptyHeader,
}
