use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Station metadata validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Sheet '{0}' not found in archive '{}'", .1.display())]
    SheetNotFound(String, PathBuf),

    #[error("No measurement rows survived filtering for year {year}")]
    EmptySheet { year: i32 },

    #[error("No historical station codes found in metadata; the code lookup is empty")]
    EmptyCodeLookup,

    #[error("Station column count differs across years: {details}")]
    StationCountMismatch { details: String },

    #[error("Year {year} covers {actual} distinct days, expected {expected}")]
    DayCountMismatch {
        year: i32,
        expected: usize,
        actual: usize,
    },

    #[error("Year {year} carries station code {code} more than once after renaming")]
    DuplicateStationCode { year: i32, code: String },

    #[error("No locality recorded in metadata for station {code}")]
    MissingLocality { code: String },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
