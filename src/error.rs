// src/error.rs
use thiserror::Error;

/// Failures of one pipeline run, export or state transition.
/// None of them are retried; callers surface the message and keep prior state.
#[derive(Debug, Error)]
pub enum CvError {
    #[error("Failed to read uploaded file: {0}")]
    FileRead(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to translate CV data: {0}")]
    Translation(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("A CV is already being processed")]
    Busy,

    #[error("No CV has been generated yet")]
    NoCv,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CvError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CvError::FileRead(_) => "FILE_READ_ERROR",
            CvError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            CvError::Translation(_) => "TRANSLATION_FAILED",
            CvError::Export(_) => "EXPORT_FAILED",
            CvError::Busy => "PROCESSING",
            CvError::NoCv => "NO_CV",
            CvError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// User-facing hints attached to error responses
    pub fn suggestions(&self) -> Vec<String> {
        let hints: &[&str] = match self {
            CvError::FileRead(_) => &[
                "Check the file is not corrupted",
                "Start from the downloadable template",
            ],
            CvError::UnsupportedFormat(_) => &[
                "Upload an Excel workbook (.xlsx, .xls)",
                "CSV and OpenDocument (.ods) files are also accepted",
            ],
            CvError::Translation(_) => &[
                "Try again in a few moments",
                "Check the translation service configuration",
            ],
            CvError::Export(_) => &["Try the export again", "Contact system administrator"],
            CvError::Busy => &["Wait for the current CV to finish processing"],
            CvError::NoCv => &["Upload a spreadsheet and generate a CV first"],
            CvError::InvalidInput(_) => &["Check your request format"],
        };
        hints.iter().map(|h| h.to_string()).collect()
    }
}
